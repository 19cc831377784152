//! Inspection helpers for figuring out what an export contains

use super::report::DateFilter;
use crate::types::Row;
use serde::Serialize;
use std::collections::BTreeSet;

/// Distinct `YYYY-MM-DD`-length prefixes of the created column, sorted
pub fn date_survey(data_rows: &[Row], created_idx: usize) -> Vec<String> {
    data_rows
        .iter()
        .filter_map(|row| row.get(created_idx))
        .map(|value| value.chars().take(10).collect::<String>())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One cell of a mapped row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedCell {
    pub index: usize,
    pub header: String,
    pub value: String,
}

/// Find the first data row in which any cell matches `filter`, paired with header labels.
///
/// Columns beyond the header are labelled `Col_<index>`.
pub fn first_match(header: &[String], data_rows: &[Row], filter: &DateFilter) -> Option<Vec<MappedCell>> {
    let row = data_rows
        .iter()
        .find(|row| row.iter().any(|cell| filter.matches(cell)))?;

    Some(
        row.iter()
            .enumerate()
            .map(|(index, value)| MappedCell {
                index,
                header: header
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| format!("Col_{}", index)),
                value: value.clone(),
            })
            .collect(),
    )
}
