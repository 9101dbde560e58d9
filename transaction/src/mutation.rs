//! Row mutations as submitted to a store.

use mutcount_core::{Key, Row};
use mutcount_mutation::{LogicalOperation, MutationBatch};

/// A single row-level mutation.
///
/// Deletes carry only the key: the store works out the row image and the
/// cascaded children from what it holds.
#[derive(Debug, Clone, PartialEq)]
pub enum RowMutation {
    Insert { table: String, values: Row },
    Update { table: String, values: Row },
    Delete { table: String, key: Key },
}

impl RowMutation {
    pub fn table(&self) -> &str {
        match self {
            Self::Insert { table, .. }
            | Self::Update { table, .. }
            | Self::Delete { table, .. } => table,
        }
    }
}

impl From<&LogicalOperation> for RowMutation {
    fn from(op: &LogicalOperation) -> Self {
        match op {
            LogicalOperation::Insert { table, values } => Self::Insert {
                table: table.clone(),
                values: values.clone(),
            },
            LogicalOperation::Update { table, values } => Self::Update {
                table: table.clone(),
                values: values.clone(),
            },
            LogicalOperation::Delete { table, key, .. } => Self::Delete {
                table: table.clone(),
                key: key.clone(),
            },
        }
    }
}

/// Lower a batch to row mutations, one per logical operation, in order.
pub fn lower(batch: &MutationBatch) -> Vec<RowMutation> {
    batch.iter().map(RowMutation::from).collect()
}
