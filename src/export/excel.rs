//! Excel (xlsx) serialization

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

use crate::error::ExportError;
use crate::model::{CellValue, Table};

/// Worksheet limits
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Single worksheet, header in the first row, no index column.
pub fn write_xlsx(table: &Table) -> Result<Vec<u8>, ExportError> {
    if table.column_count() > MAX_COLUMNS {
        return Err(ExportError::TooManyColumns(table.column_count()));
    }
    // One row is taken by the header
    if table.row_count() >= MAX_ROWS {
        return Err(ExportError::TooManyRows(table.row_count()));
    }

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, column) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, column.name.as_str())?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let excel_row = (r + 1) as u32;
        for (col, cell) in row.cells.iter().enumerate() {
            write_cell(
                worksheet,
                excel_row,
                col as u16,
                cell,
                &date_format,
                &datetime_format,
            )?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    date_format: &Format,
    datetime_format: &Format,
) -> Result<(), ExportError> {
    match cell {
        // Missing cells stay blank
        CellValue::Null => {}
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        CellValue::String(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
        CellValue::Date(d) => match excel_date(d) {
            Some(dt) => {
                worksheet.write_datetime_with_format(row, col, &dt, date_format)?;
            }
            None => {
                worksheet.write_string(row, col, d.to_string())?;
            }
        },
        CellValue::DateTime(dt) => match excel_datetime(dt) {
            Some(excel_dt) => {
                worksheet.write_datetime_with_format(row, col, &excel_dt, datetime_format)?;
            }
            None => {
                worksheet.write_string(row, col, dt.to_string())?;
            }
        },
    }
    Ok(())
}

/// Dates outside the spreadsheet epoch range are written as text instead
fn excel_date(date: &NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}

fn excel_datetime(datetime: &NaiveDateTime) -> Option<ExcelDateTime> {
    let seconds = datetime.second() as f64 + datetime.nanosecond() as f64 / 1e9;
    excel_date(&datetime.date())?
        .and_hms(datetime.hour() as u16, datetime.minute() as u8, seconds)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_produces_zip_container() {
        let table = Table::from_rows(
            vec!["a", "b"],
            vec![vec![CellValue::Int(1), CellValue::from("x")]],
        );
        let bytes = write_xlsx(&table).unwrap();
        assert_eq!(&bytes[0..4], b"PK\x03\x04");
    }

    #[test]
    fn test_dates_convert() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert!(excel_date(&date).is_some());
        let datetime = date.and_hms_opt(13, 45, 30).unwrap();
        assert!(excel_datetime(&datetime).is_some());
    }
}
