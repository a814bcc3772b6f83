//! CSV parser

use crate::error::ParseError;
use crate::model::{dedupe_header_names, CellValue, Column, Table};

use super::{positional_names, HeaderMode, Parser};

/// Tokens read as missing values
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Parser for comma-separated files
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, bytes: &[u8], header: HeaderMode) -> Result<Table, ParseError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let records = csv_reader
            .records()
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = records.into_iter().peekable();

        let names = match header {
            HeaderMode::FirstRow => {
                let header_record = records.next().ok_or(ParseError::EmptyCsv)?;
                let names: Vec<String> = header_record.iter().map(str::to_string).collect();
                dedupe_header_names(names)
            }
            HeaderMode::None => {
                let width = records.peek().map(|r| r.len()).ok_or(ParseError::EmptyCsv)?;
                positional_names(width)
            }
        };

        let columns: Vec<Column> = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(name, i))
            .collect();

        let mut table = Table::new(columns);

        for (idx, record) in records.enumerate() {
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);

            if record.len() > table.column_count() {
                return Err(ParseError::RaggedRow {
                    line,
                    expected: table.column_count(),
                    found: record.len(),
                });
            }

            let cells: Vec<CellValue> = record.iter().map(parse_cell_value).collect();
            table.add_row(cells, line);
        }

        table.infer_column_types();

        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("csv")
    }
}

/// Parse a field into a CellValue: missing, integer, float, or verbatim text
fn parse_cell_value(s: &str) -> CellValue {
    let trimmed = s.trim();

    if MISSING_MARKERS.contains(&trimmed) {
        return CellValue::Null;
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        // "inf" and friends stay text
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }

    CellValue::String(s.to_string())
}
