//! Store error types.

use mutcount_core::Key;
use mutcount_mutation::MutationError;
use thiserror::Error;

/// Errors returned by a store when it refuses a batch.
///
/// The harness classifies rejections by their rendered text, so every
/// variant carries the store's message verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The request itself is malformed or over a server limit.
    #[error("InvalidArgument: {message}")]
    InvalidArgument { message: String },

    /// A row with the inserted key is already present.
    #[error("AlreadyExists: {message}: table {table}, key {key}")]
    AlreadyExists {
        table: String,
        key: Key,
        message: String,
    },

    /// An updated row or an interleaved parent row is absent.
    #[error("NotFound: {message}: table {table}, key {key}")]
    NotFound {
        table: String,
        key: Key,
        message: String,
    },

    /// A constraint on the stored data would be broken.
    #[error("FailedPrecondition: {message}")]
    FailedPrecondition { message: String },

    /// A mutation does not fit the schema.
    #[error("InvalidArgument: {0}")]
    Schema(#[from] MutationError),

    /// The store could not be reached or gave up.
    #[error("Unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn already_exists(table: impl Into<String>, key: Key) -> Self {
        Self::AlreadyExists {
            table: table.into(),
            key,
            message: mutcount_core::messages::ERR_ROW_EXISTS.to_string(),
        }
    }

    pub fn not_found(table: impl Into<String>, key: Key, message: impl Into<String>) -> Self {
        Self::NotFound {
            table: table.into(),
            key,
            message: message.into(),
        }
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::FailedPrecondition {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
