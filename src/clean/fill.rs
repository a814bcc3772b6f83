//! Mean-fill of missing numeric cells

use serde::Serialize;

use crate::model::{CellValue, Table};

/// One numeric column that had missing cells replaced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilledColumn {
    pub column: String,
    pub mean: f64,
    pub cells_filled: usize,
}

/// Replace missing cells of every numeric column with that column's mean.
///
/// Text columns are untouched. A numeric column without any numbers has no
/// mean and is left as is.
pub fn fill_missing_with_mean(table: &mut Table) -> Vec<FilledColumn> {
    let mut filled = Vec::new();

    for col_idx in table.numeric_column_indices() {
        let Some(mean) = column_mean(table, col_idx) else {
            continue;
        };

        let mut count = 0usize;
        for row in &mut table.rows {
            if let Some(cell) = row.cells.get_mut(col_idx) {
                if cell.is_null() {
                    *cell = CellValue::Float(mean);
                    count += 1;
                }
            }
        }

        if count > 0 {
            filled.push(FilledColumn {
                column: table.columns[col_idx].name.clone(),
                mean,
                cells_filled: count,
            });
        }
    }

    filled
}

/// Arithmetic mean over the numeric cells of a column
pub fn column_mean(table: &Table, col_idx: usize) -> Option<f64> {
    let (sum, count) = table
        .column_values(col_idx)
        .filter_map(CellValue::as_f64)
        .fold((0.0f64, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
