//! Generation error types.

use mutcount_mutation::MutationError;
use thiserror::Error;

/// Errors that can occur while generating batches.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenError {
    #[error("target {target} is not a positive multiple of the unit cost {unit_cost}")]
    UnsatisfiableTarget { target: u64, unit_cost: u64 },

    #[error("table {0} is not declared")]
    UnknownTable(String),

    #[error("table {0} is not interleaved in a parent")]
    NotInterleaved(String),

    #[error("cost prediction failed: {0}")]
    Cost(#[from] MutationError),
}

impl GenError {
    pub fn unsatisfiable(target: u64, unit_cost: u64) -> Self {
        Self::UnsatisfiableTarget { target, unit_cost }
    }

    pub fn unknown_table(name: impl Into<String>) -> Self {
        Self::UnknownTable(name.into())
    }
}

/// Result type for batch generation.
pub type GenResult<T> = Result<T, GenError>;
