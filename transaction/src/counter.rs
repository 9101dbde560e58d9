//! Mutation counting from the rows a store writes and removes.

use mutcount_core::Row;
use mutcount_mutation::CostModel;
use mutcount_registry::{IndexDef, TableDef};

/// Counts what a commit does to base rows and index entries.
///
/// The count is taken from the rows themselves: written cells, stored row
/// contents and the index entries they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationCounter {
    model: CostModel,
}

impl MutationCounter {
    pub fn new(model: CostModel) -> Self {
        Self { model }
    }

    /// A new row. Every index gets an entry, NULL keys included.
    pub fn inserted(&self, table: &TableDef, written: &Row) -> u64 {
        let entries = table.indexes.len() as u64;
        match self.model {
            CostModel::Row => 1 + entries,
            CostModel::Cell => written.len() as u64 + entries,
        }
    }

    /// Columns written over an existing row. An index whose key holds a
    /// written column has its entry replaced; one that only stores a
    /// written column has it rewritten in place.
    pub fn updated(&self, table: &TableDef, written: &Row) -> u64 {
        let mut replaced = 0u64;
        let mut rewritten = 0u64;
        for index in &table.indexes {
            let writes = |column: &str| {
                written
                    .keys()
                    .any(|c| c.as_str() == column && !table.is_key_column(c))
            };
            if index.key_columns.iter().any(|c| writes(c.as_str())) {
                replaced += 1;
            } else if index.stored_columns.iter().any(|c| writes(c.as_str())) {
                rewritten += 1;
            }
        }
        match self.model {
            CostModel::Row => 1 + replaced,
            CostModel::Cell => written.len() as u64 + 2 * replaced + rewritten,
        }
    }

    /// A deleted row, or the tombstone of a row that is not there.
    pub fn removed(&self, table: &TableDef, stored: Option<&Row>) -> u64 {
        1 + held_entries(table, stored)
    }

    /// An interleaved child row removed with its parent.
    pub fn cascaded(&self, table: &TableDef, stored: &Row) -> u64 {
        let entries = held_entries(table, Some(stored));
        match self.model {
            CostModel::Row => 1 + entries,
            CostModel::Cell => entries,
        }
    }
}

/// Index entries a stored row holds.
fn held_entries(table: &TableDef, stored: Option<&Row>) -> u64 {
    table
        .indexes
        .iter()
        .filter(|index| holds_entry(index, stored))
        .count() as u64
}

fn holds_entry(index: &IndexDef, stored: Option<&Row>) -> bool {
    if !index.null_filtered {
        return true;
    }
    let Some(row) = stored else {
        return false;
    };
    index
        .key_columns
        .iter()
        .any(|c| row.get(c).map(|v| !v.is_null()).unwrap_or(false))
}
