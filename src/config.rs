//! Configuration handling for tabclean

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Target format for exported files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    /// File extension appended to the exported file's stem
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    /// MIME type offered with the download
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
        }
    }
}

/// How results are reported on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(ReportFormat::Terminal),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Per-file choices, one for each control of the original form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileOptions {
    /// Drop exact-duplicate rows
    pub remove_duplicates: bool,
    /// Fill missing numeric cells with the column mean
    pub fill_missing: bool,
    /// Columns to keep, in order; `None` keeps all
    pub columns: Option<Vec<String>>,
    /// Render a bar chart of the first two numeric columns
    pub show_chart: bool,
    /// Export target
    pub format: ExportFormat,
}

/// Configuration for a run over one or more files
#[derive(Debug, Clone)]
pub struct Config {
    /// Input files
    pub inputs: Vec<PathBuf>,
    /// Options applied to every input file
    pub file_options: FileOptions,
    /// Directory exported files are written to
    pub output_dir: PathBuf,
    /// Skip writing exported files
    pub no_export: bool,
    /// Rows shown in each preview; 0 disables previews
    pub preview_rows: usize,
    /// Stdout report format
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            file_options: FileOptions::default(),
            output_dir: PathBuf::from("converted"),
            no_export: false,
            preview_rows: 5,
            report_format: ReportFormat::default(),
        }
    }
}

impl Config {
    /// Create a new Config for the given inputs
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            ..Default::default()
        }
    }

    /// Enable duplicate removal
    pub fn with_remove_duplicates(mut self, enabled: bool) -> Self {
        self.file_options.remove_duplicates = enabled;
        self
    }

    /// Enable mean-fill of missing numeric values
    pub fn with_fill_missing(mut self, enabled: bool) -> Self {
        self.file_options.fill_missing = enabled;
        self
    }

    /// Set the column selection
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.file_options.columns = Some(columns);
        self
    }

    /// Enable chart rendering
    pub fn with_show_chart(mut self, enabled: bool) -> Self {
        self.file_options.show_chart = enabled;
        self
    }

    /// Set export format
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.file_options.format = format;
        self
    }

    /// Set output directory
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Disable writing exported files
    pub fn with_no_export(mut self, no_export: bool) -> Self {
        self.no_export = no_export;
        self
    }

    /// Set preview row count
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Set report format
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("csv".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("Excel".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert!("parquet".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_metadata() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Excel.extension(), "xlsx");
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
        assert!(ExportFormat::Excel.mime_type().ends_with("spreadsheetml.sheet"));
    }

    #[test]
    fn test_builder() {
        let config = Config::new(vec![PathBuf::from("a.csv")])
            .with_remove_duplicates(true)
            .with_columns(vec!["x".into()])
            .with_format(ExportFormat::Excel);
        assert!(config.file_options.remove_duplicates);
        assert!(!config.file_options.fill_missing);
        assert_eq!(config.file_options.columns, Some(vec!["x".to_string()]));
        assert_eq!(config.file_options.format, ExportFormat::Excel);
        assert_eq!(config.preview_rows, 5);
    }
}
