//! Column metadata and declared types

use serde::{Deserialize, Serialize};

use super::table::CellValue;

/// Declared type of a column, fixed at ingest time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Integers and floats; a column with no values at all is numeric too
    #[default]
    Numeric,
    Text,
}

impl ColumnType {
    /// Majority-type inference over the non-missing cells of a column.
    ///
    /// Numeric wins only with a strict majority; ties go to text.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> ColumnType {
        let mut numeric = 0usize;
        let mut other = 0usize;

        for cell in cells {
            match cell {
                CellValue::Null => {}
                c if c.is_numeric() => numeric += 1,
                _ => other += 1,
            }
        }

        if other == 0 || numeric > other {
            ColumnType::Numeric
        } else {
            ColumnType::Text
        }
    }

    pub fn is_numeric(self) -> bool {
        self == ColumnType::Numeric
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (from header, or positional when parsed without one)
    pub name: String,
    /// Column index (0-based position)
    pub index: usize,
    /// Declared type
    pub column_type: ColumnType,
}

impl Column {
    /// Create a new column with name and index
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            column_type: ColumnType::default(),
        }
    }

    /// Create a column with a declared type
    pub fn with_type(name: impl Into<String>, index: usize, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            index,
            column_type,
        }
    }
}

/// Make header names unique by suffixing `.1`, `.2`, ... to later repeats.
pub fn dedupe_header_names(names: Vec<String>) -> Vec<String> {
    use rustc_hash::FxHashSet;

    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        let mut suffix = 0usize;
        while seen.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}.{}", name, suffix);
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }

    out
}
