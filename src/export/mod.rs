//! Serialization of tables into downloadable artifacts

mod csv;
mod excel;

use tracing::debug;

use crate::config::ExportFormat;
use crate::error::ExportError;
use crate::model::Table;

pub use self::csv::write_csv;
pub use self::excel::write_xlsx;

/// Serialized table ready for download. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    bytes: Vec<u8>,
    mime: &'static str,
    file_name: String,
}

impl ExportArtifact {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Output file name: the original stem (text before the last `.`) plus the
/// target format's extension.
pub fn export_file_name(original_name: &str, format: ExportFormat) -> String {
    let stem = original_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(original_name);
    format!("{}.{}", stem, format.extension())
}

/// Serialize `table` in `format`. On failure nothing is produced.
pub fn export(
    table: &Table,
    format: ExportFormat,
    original_name: &str,
) -> Result<ExportArtifact, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => write_csv(table)?,
        ExportFormat::Excel => write_xlsx(table)?,
    };

    let file_name = export_file_name(original_name, format);
    debug!(file = %file_name, bytes = bytes.len(), "export complete");

    Ok(ExportArtifact {
        bytes,
        mime: format.mime_type(),
        file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("report.XLSX", ExportFormat::Csv), "report.csv");
        assert_eq!(export_file_name("data.csv", ExportFormat::Excel), "data.xlsx");
        assert_eq!(export_file_name("a.b.c.csv", ExportFormat::Csv), "a.b.c.csv");
        assert_eq!(export_file_name("noext", ExportFormat::Excel), "noext.xlsx");
    }

    #[test]
    fn test_artifact_metadata() {
        let table = Table::from_rows(vec!["a"], vec![vec![CellValue::Int(1)]]);

        let csv = export(&table, ExportFormat::Csv, "in.xlsx").unwrap();
        assert_eq!(csv.mime(), "text/csv");
        assert_eq!(csv.file_name(), "in.csv");
        assert_eq!(csv.bytes(), b"a\n1\n");

        let xlsx = export(&table, ExportFormat::Excel, "in.csv").unwrap();
        assert_eq!(
            xlsx.mime(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(xlsx.file_name(), "in.xlsx");
    }
}
