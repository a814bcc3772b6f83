//! Data model for tabular data representation

mod schema;
mod table;

pub use schema::{dedupe_header_names, Column, ColumnType};
pub use table::{CellValue, Row, Table};
