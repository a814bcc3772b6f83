//! Cleaning steps applied between ingest and column selection

mod dedupe;
mod fill;

use serde::Serialize;
use tracing::info;

use crate::config::FileOptions;
use crate::model::Table;

pub use dedupe::remove_duplicates;
pub use fill::{column_mean, fill_missing_with_mean, FilledColumn};

/// An individually toggled cleaning operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStep {
    RemoveDuplicates,
    FillMissing,
}

impl CleaningStep {
    /// Steps enabled by a set of options, in their listed order
    pub fn from_options(options: &FileOptions) -> Vec<CleaningStep> {
        let mut steps = Vec::new();
        if options.remove_duplicates {
            steps.push(CleaningStep::RemoveDuplicates);
        }
        if options.fill_missing {
            steps.push(CleaningStep::FillMissing);
        }
        steps
    }
}

impl std::fmt::Display for CleaningStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleaningStep::RemoveDuplicates => write!(f, "remove duplicates"),
            CleaningStep::FillMissing => write!(f, "fill missing values"),
        }
    }
}

/// What the cleaning steps did to a table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    /// Steps in the order they ran
    pub steps: Vec<CleaningStep>,
    pub duplicates_removed: usize,
    pub filled_columns: Vec<FilledColumn>,
}

impl CleanReport {
    pub fn cells_filled(&self) -> usize {
        self.filled_columns.iter().map(|c| c.cells_filled).sum()
    }
}

/// Run each step once, in the given order
pub fn apply_steps(table: &mut Table, steps: &[CleaningStep]) -> CleanReport {
    let mut report = CleanReport::default();

    for &step in steps {
        match step {
            CleaningStep::RemoveDuplicates => {
                let removed = remove_duplicates(table);
                info!(removed, "duplicates removed");
                report.duplicates_removed += removed;
            }
            CleaningStep::FillMissing => {
                let filled = fill_missing_with_mean(table);
                info!(columns = filled.len(), "missing values filled with mean");
                report.filled_columns.extend(filled);
            }
        }
        report.steps.push(step);
    }

    report
}
