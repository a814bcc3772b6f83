//! JSON report output

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use super::{FileReport, FileStatus};

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonRunOutput<'a> {
    files: &'a [FileReport],
    stats: JsonStats,
}

#[derive(Serialize)]
struct JsonStats {
    files_processed: usize,
    files_failed: usize,
}

impl JsonOutput {
    pub fn render(&self, reports: &[FileReport], writer: &mut dyn Write) -> Result<()> {
        let failed = reports
            .iter()
            .filter(|r| r.status == FileStatus::Failed)
            .count();

        let output = JsonRunOutput {
            files: reports,
            stats: JsonStats {
                files_processed: reports.len() - failed,
                files_failed: failed,
            },
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_counts_failures() {
        let reports = vec![FileReport::failed("bad.csv", "no columns to parse from file")];
        let mut buf = Vec::new();
        JsonOutput::compact().render(&reports, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["stats"]["files_failed"], 1);
        assert_eq!(value["stats"]["files_processed"], 0);
        assert_eq!(value["files"][0]["status"], "failed");
        assert_eq!(value["files"][0]["error"], "no columns to parse from file");
        assert!(value["files"][0].get("output").is_none());
    }
}
