//! Excel file parser (xlsx, xls, ods)

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::error::ParseError;
use crate::model::{dedupe_header_names, CellValue, Column, Table};

use super::{positional_names, HeaderMode, Parser};

/// Parser for Excel workbooks; reads the first sheet
pub struct ExcelParser;

impl Parser for ExcelParser {
    fn parse(&self, bytes: &[u8], header: HeaderMode) -> Result<Table, ParseError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ParseError::NoSheets)?;

        let range: Range<Data> = workbook.worksheet_range(&sheet_name)?;

        parse_range(&range, header)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(
            ext.to_lowercase().as_str(),
            "xlsx" | "xls" | "ods" | "xlsm" | "xlsb"
        )
    }

    fn retries_headerless(&self) -> bool {
        true
    }
}

fn parse_range(range: &Range<Data>, header: HeaderMode) -> Result<Table, ParseError> {
    let (_, col_count) = range.get_size();

    if range.is_empty() {
        return Ok(Table::default());
    }

    let mut rows = range.rows();

    let names = match header {
        HeaderMode::FirstRow => {
            let header_row = rows.next().unwrap_or(&[]);
            if header_row.iter().all(is_blank) {
                return Err(ParseError::InvalidHeader {
                    column: 0,
                    reason: "the whole row is blank".to_string(),
                });
            }
            let names = header_row
                .iter()
                .enumerate()
                .map(|(i, cell)| header_name(i, cell))
                .collect::<Result<Vec<_>, _>>()?;
            dedupe_header_names(names)
        }
        HeaderMode::None => positional_names(col_count),
    };

    let columns: Vec<Column> = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| Column::new(name, i))
        .collect();

    let mut table = Table::new(columns);
    let first_line = if header == HeaderMode::FirstRow { 2 } else { 1 };

    for (offset, row) in rows.enumerate() {
        let cells: Vec<CellValue> = row.iter().take(col_count).map(convert_cell).collect();
        table.add_row(cells, first_line + offset);
    }

    table.infer_column_types();

    Ok(table)
}

/// Name for a header cell. Blank cells get an `Unnamed: {i}` placeholder,
/// error cells make the header unusable.
fn header_name(column: usize, cell: &Data) -> Result<String, ParseError> {
    match cell {
        Data::Error(e) => Err(ParseError::InvalidHeader {
            column,
            reason: format!("an error value (#{:?})", e),
        }),
        blank if is_blank(blank) => Ok(format!("Unnamed: {}", column)),
        other => Ok(cell_to_string(other)),
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(s.clone())
            }
        }
        Data::Float(f) => {
            // Whole numbers come back as Int
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let s = format!("{}", dt);
            if let Ok(datetime) =
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
            {
                CellValue::DateTime(datetime)
            } else if let Ok(datetime) =
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
            {
                CellValue::DateTime(datetime)
            } else if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                CellValue::Date(date)
            } else {
                CellValue::String(s)
            }
        }
        Data::DateTimeIso(s) => {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::String(s.clone())
            }
        }
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#{:?}", e)),
    }
}
