//! Error types for ingest, selection, export and session operations

use thiserror::Error;

use crate::session::FileId;

/// Failure to turn uploaded bytes into a table
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("no columns to parse from file")]
    EmptyCsv,

    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("no sheets found in workbook")]
    NoSheets,

    #[error("header cell {column} is {reason}")]
    InvalidHeader { column: usize, reason: String },
}

/// Projection to a list of column names failed
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// Serializing a table for download failed
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV output: {0}")]
    Flush(String),

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("table has {0} columns, more than a worksheet can hold")]
    TooManyColumns(usize),

    #[error("table has {0} rows, more than a worksheet can hold")]
    TooManyRows(usize),
}

/// Session-level failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no uploaded file with id {0}")]
    UnknownFile(FileId),

    #[error("failed to parse {file}: {source}")]
    Ingest {
        file: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
