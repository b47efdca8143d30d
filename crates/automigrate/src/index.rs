//! Index aggregation.
//!
//! `SHOW INDEX` reports one row per (index, column) pair. This module groups
//! those rows into composite [`IndexDescriptor`]s.

use indexmap::IndexMap;

use crate::schema::{IndexDescriptor, RawIndexRow};

/// Groups raw index rows into composite indexes.
///
/// - Rows of the primary key are dropped; primary keys are carried by the
///   column definitions.
/// - Indexes appear in the order their first row was listed.
/// - Columns are ordered by `sequence_in_index`. Rows with equal sequence keep
///   their listing order.
/// - `unique` comes from the first listed row of each index, before sorting.
#[must_use]
pub fn aggregate_indexes(rows: &[RawIndexRow]) -> IndexMap<String, IndexDescriptor> {
    let mut groups: IndexMap<&str, Vec<&RawIndexRow>> = IndexMap::new();
    for row in rows.iter().filter(|row| !row.is_primary()) {
        groups.entry(row.key_name.as_str()).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|(name, mut group)| {
            let unique = group[0].is_unique();
            group.sort_by_key(|row| row.sequence_in_index);
            let descriptor = IndexDescriptor {
                name: name.to_string(),
                columns: group.iter().map(|row| row.column_name.clone()).collect(),
                unique,
            };
            (name.to_string(), descriptor)
        })
        .collect()
}

/// Expands an index back into the raw rows a listing would report for it.
#[must_use]
pub fn expand_index(index: &IndexDescriptor) -> Vec<RawIndexRow> {
    let non_unique = i64::from(!index.unique);
    index
        .columns
        .iter()
        .zip(1u32..)
        .map(|(column, seq)| RawIndexRow::new(&index.name, column, seq, non_unique))
        .collect()
}
