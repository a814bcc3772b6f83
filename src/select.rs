//! Column projection

use crate::error::SelectError;
use crate::model::{Column, Row, Table};

/// Project `table` onto `names`, in that order.
///
/// Names may repeat; each occurrence becomes its own column. An empty list
/// gives a table with no columns, which is not an error.
pub fn select_columns(table: &Table, names: &[String]) -> Result<Table, SelectError> {
    let indices = names
        .iter()
        .map(|name| {
            table
                .column_index(name)
                .ok_or_else(|| SelectError::UnknownColumn(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let columns = indices
        .iter()
        .enumerate()
        .map(|(pos, &src)| {
            let source = &table.columns[src];
            Column::with_type(source.name.clone(), pos, source.column_type)
        })
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let cells = indices.iter().map(|&i| row.cells[i].clone()).collect();
            Row::new(cells, row.source_line)
        })
        .collect();

    Ok(Table { columns, rows })
}

/// Apply an optional selection; `None` keeps every column
pub fn apply_selection(table: Table, names: Option<&[String]>) -> Result<Table, SelectError> {
    match names {
        None => Ok(table),
        Some(names) => select_columns(&table, names),
    }
}
