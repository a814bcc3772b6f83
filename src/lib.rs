//! tabclean - Clean and convert tabular data
//!
//! Loads CSV and Excel files, optionally drops duplicate rows and fills
//! missing numeric values with column means, projects a chosen set of columns,
//! charts numeric columns and exports the result as CSV or Excel.

pub mod chart;
pub mod clean;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod output;
pub mod parser;
pub mod select;
pub mod session;

pub use config::{Config, ExportFormat, FileOptions};
pub use export::ExportArtifact;
pub use model::Table;
pub use parser::{IngestOutcome, UploadedFile};
pub use session::{FileId, Session};
