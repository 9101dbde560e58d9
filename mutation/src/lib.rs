//! mutcount Mutation
//!
//! Predict how many mutations the store counts for logical writes.
//!
//! Responsibilities:
//! - Describe logical inserts, updates and deletes
//! - Validate operations against the schema
//! - Price each operation under the selected cost model
//! - Account for interleave cascades on delete
//!
//! # Module Structure
//!
//! - `calculator` - CostCalculator that coordinates the rules
//! - `ops/` - Per-operation pricing (insert, update, delete)
//! - `op` / `batch` - Logical operations and atomic batches
//! - `validation` - Shared schema checks
//! - `error` - Error types for invalid operations
//! - `result` - Cost model and predicted costs

mod batch;
mod calculator;
mod error;
mod op;
mod ops;
mod result;
mod validation;

pub use batch::MutationBatch;
pub use calculator::CostCalculator;
pub use error::{MutationError, MutationResult, Violation};
pub use op::{key_of, CascadedRow, LogicalOperation, OperationKind, RowImage};
pub use result::{CostModel, MutationCost};
