//! mutcount Transaction
//!
//! The boundary between the harness and a transactional store.
//!
//! Responsibilities:
//! - Lower logical operations to row mutations
//! - Define the async `MutationSink` the harness submits batches to
//! - Provide an in-process `MemoryStore` that applies batches atomically
//!   and enforces the per-transaction mutation limit

mod buffer;
mod counter;
mod error;
mod memory;
mod mutation;
mod sink;

pub use buffer::TransactionBuffer;
pub use counter::MutationCounter;
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, StoreConfig};
pub use mutation::{lower, RowMutation};
pub use sink::{CommitMarker, MutationSink};
