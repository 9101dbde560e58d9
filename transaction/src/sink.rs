//! The async store boundary.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StoreResult;
use crate::RowMutation;

/// Receipt of a committed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitMarker {
    /// Commit sequence number, increasing per store.
    pub sequence: u64,
    /// Mutations the store counted for the batch.
    pub mutation_count: u64,
}

/// A transactional sink that applies a batch atomically or not at all.
#[async_trait]
pub trait MutationSink: Send + Sync {
    async fn apply(&self, mutations: Vec<RowMutation>) -> StoreResult<CommitMarker>;
}

#[async_trait]
impl<T: MutationSink + ?Sized> MutationSink for Arc<T> {
    async fn apply(&self, mutations: Vec<RowMutation>) -> StoreResult<CommitMarker> {
        (**self).apply(mutations).await
    }
}
