//! Reporting of processed files

mod json;
mod terminal;

use serde::Serialize;

use crate::chart::BarChart;
use crate::clean::CleanReport;

pub use json::JsonOutput;
pub use terminal::{render_chart, render_preview, Status, TerminalOutput};

/// Outcome of processing one input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Failed,
}

/// Summary of one file's pass through the pipeline
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub rows_in: usize,
    pub columns_in: usize,
    pub rows_out: usize,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaning: Option<CleanReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<BarChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl FileReport {
    /// Report for a file that could not be processed
    pub fn failed(file: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            file: file.into(),
            status: FileStatus::Failed,
            warning: None,
            error: Some(format!("{:#}", error)),
            rows_in: 0,
            columns_in: 0,
            rows_out: 0,
            columns: Vec::new(),
            cleaning: None,
            chart: None,
            output: None,
            mime: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == FileStatus::Ok
    }
}
