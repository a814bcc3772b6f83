//! CSV serialization

use crate::error::ExportError;
use crate::model::Table;

/// Comma-delimited, header row first, no index column. Missing cells are
/// written empty; a table without columns produces no bytes at all.
pub fn write_csv(table: &Table) -> Result<Vec<u8>, ExportError> {
    if table.column_count() == 0 {
        return Ok(Vec::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .from_writer(Vec::new());

    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;

    for row in &table.rows {
        writer.write_record(row.cells.iter().map(|c| c.display().into_owned()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))
}
