//! Exact-duplicate row removal

use rustc_hash::FxHashSet;

use crate::model::{CellValue, Table};

/// Drop rows whose cells all equal an earlier row's. Keeps the first
/// occurrence and the relative order of kept rows. Returns the number removed.
pub fn remove_duplicates(table: &mut Table) -> usize {
    let before = table.rows.len();
    let mut seen: FxHashSet<Vec<CellValue>> = FxHashSet::default();

    table.rows.retain(|row| seen.insert(row.cells.clone()));

    before - table.rows.len()
}
