//! Bar chart over the leading numeric columns

use serde::Serialize;

use crate::model::Table;

/// Number of numeric columns a chart draws
pub const MAX_SERIES: usize = 2;

/// One plotted column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    /// One value per row; `None` where the cell is missing or not a number
    pub values: Vec<Option<f64>>,
}

/// A grouped bar chart, one group per row, labeled by row position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub series: Vec<Series>,
}

impl BarChart {
    /// Chart the first two numeric columns by position, or nothing when the
    /// table has no numeric column.
    pub fn from_table(table: &Table) -> Option<BarChart> {
        let series: Vec<Series> = table
            .numeric_column_indices()
            .into_iter()
            .take(MAX_SERIES)
            .map(|idx| Series {
                name: table.columns[idx].name.clone(),
                values: table.column_values(idx).map(|c| c.as_f64()).collect(),
            })
            .collect();

        if series.is_empty() {
            None
        } else {
            Some(BarChart { series })
        }
    }

    pub fn row_count(&self) -> usize {
        self.series.first().map(|s| s.values.len()).unwrap_or(0)
    }

    /// Largest absolute value across all series, used for scaling bars
    pub fn max_magnitude(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold(0.0f64, |acc, v| acc.max(v.abs()))
    }
}
