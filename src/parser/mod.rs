//! Ingest layer: turns uploaded bytes into tables

mod csv;
mod excel;

use std::path::Path;

use tracing::{debug, warn};

use crate::error::ParseError;
use crate::model::Table;

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;

/// A file handed to the ingestor: its name (with extension) and raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Text after the last `.`; the whole name when there is no dot
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Text before the last `.`; the whole name when there is no dot
    pub fn stem(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.name)
    }
}

/// Whether the first row carries column names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    FirstRow,
    /// Columns are named by position: "0", "1", ...
    None,
}

/// Trait for parsing uploaded bytes into a table
pub trait Parser: Send + Sync {
    /// Parse raw bytes and return a Table
    fn parse(&self, bytes: &[u8], header: HeaderMode) -> Result<Table, ParseError>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;

    /// Whether a failed header parse may be retried without a header
    fn retries_headerless(&self) -> bool {
        false
    }
}

/// Result of ingesting one file
#[derive(Debug)]
pub enum IngestOutcome {
    ParsedWithHeader(Table),
    /// The header row could not be used; the table was re-read without one
    ParsedHeaderless { table: Table, warning: String },
    ParseFailed(ParseError),
}

impl IngestOutcome {
    pub fn table(&self) -> Option<&Table> {
        match self {
            IngestOutcome::ParsedWithHeader(table)
            | IngestOutcome::ParsedHeaderless { table, .. } => Some(table),
            IngestOutcome::ParseFailed(_) => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            IngestOutcome::ParsedHeaderless { warning, .. } => Some(warning),
            _ => None,
        }
    }

    /// Split into the table plus any warning, or the final parse error
    pub fn into_result(self) -> Result<(Table, Option<String>), ParseError> {
        match self {
            IngestOutcome::ParsedWithHeader(table) => Ok((table, None)),
            IngestOutcome::ParsedHeaderless { table, warning } => Ok((table, Some(warning))),
            IngestOutcome::ParseFailed(err) => Err(err),
        }
    }
}

/// Picks a parser by file extension; anything that is not CSV is read as a workbook
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
    fallback: Box<dyn Parser>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(CsvParser)],
            fallback: Box::new(ExcelParser),
        }
    }

    /// Get a parser for the given file
    pub fn get_parser(&self, file: &UploadedFile) -> &dyn Parser {
        let ext = file.extension();
        self.parsers
            .iter()
            .find(|p| p.supports_extension(ext))
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// Parse a file, retrying once without a header where the parser allows it
    pub fn ingest(&self, file: &UploadedFile) -> IngestOutcome {
        let parser = self.get_parser(file);

        let header_err = match parser.parse(&file.bytes, HeaderMode::FirstRow) {
            Ok(table) => {
                debug!(
                    file = %file.name,
                    rows = table.row_count(),
                    columns = table.column_count(),
                    "parsed with header"
                );
                return IngestOutcome::ParsedWithHeader(table);
            }
            Err(err) => err,
        };

        if !parser.retries_headerless() {
            return IngestOutcome::ParseFailed(header_err);
        }

        warn!(file = %file.name, error = %header_err, "header parse failed, retrying without header");

        match parser.parse(&file.bytes, HeaderMode::None) {
            Ok(table) => IngestOutcome::ParsedHeaderless {
                table,
                warning: format!(
                    "There was an issue reading the Excel file {} ({}). Read it without a header.",
                    file.name, header_err
                ),
            },
            Err(err) => IngestOutcome::ParseFailed(err),
        }
    }
}

/// Ingest a file with the default parsers
pub fn ingest(file: &UploadedFile) -> IngestOutcome {
    ParserFactory::new().ingest(file)
}

/// Positional names used when there is no header row
pub(crate) fn positional_names(count: usize) -> Vec<String> {
    (0..count).map(|i| i.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_and_stem() {
        let file = UploadedFile::new("report.final.XLSX", Vec::new());
        assert_eq!(file.extension(), "XLSX");
        assert_eq!(file.stem(), "report.final");

        let bare = UploadedFile::new("README", Vec::new());
        assert_eq!(bare.extension(), "README");
        assert_eq!(bare.stem(), "README");
    }

    #[test]
    fn test_csv_routes_to_csv_parser() {
        let file = UploadedFile::new("data.CSV", b"a,b\n1,2\n".to_vec());
        let outcome = ingest(&file);
        assert!(matches!(outcome, IngestOutcome::ParsedWithHeader(_)));
    }

    #[test]
    fn test_csv_failure_is_not_retried() {
        let file = UploadedFile::new("empty.csv", Vec::new());
        let outcome = ingest(&file);
        assert!(matches!(outcome, IngestOutcome::ParseFailed(ParseError::EmptyCsv)));
    }

    #[test]
    fn test_non_workbook_bytes_fail_both_stages() {
        let file = UploadedFile::new("notes.xlsx", b"not a workbook".to_vec());
        let outcome = ingest(&file);
        assert!(outcome.table().is_none());
        assert!(outcome.into_result().is_err());
    }
}
