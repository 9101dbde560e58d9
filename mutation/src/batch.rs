//! Atomic batches of logical operations.

use crate::LogicalOperation;

/// Ordered logical operations submitted as one transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationBatch {
    ops: Vec<LogicalOperation>,
}

impl MutationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, op: LogicalOperation) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogicalOperation> {
        self.ops.iter()
    }

    pub fn ops(&self) -> &[LogicalOperation] {
        &self.ops
    }
}

impl From<Vec<LogicalOperation>> for MutationBatch {
    fn from(ops: Vec<LogicalOperation>) -> Self {
        Self { ops }
    }
}

impl FromIterator<LogicalOperation> for MutationBatch {
    fn from_iter<I: IntoIterator<Item = LogicalOperation>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl Extend<LogicalOperation> for MutationBatch {
    fn extend<I: IntoIterator<Item = LogicalOperation>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}

impl IntoIterator for MutationBatch {
    type Item = LogicalOperation;
    type IntoIter = std::vec::IntoIter<LogicalOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a MutationBatch {
    type Item = &'a LogicalOperation;
    type IntoIter = std::slice::Iter<'a, LogicalOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
