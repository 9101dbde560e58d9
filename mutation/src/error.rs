//! Mutation error types.

use thiserror::Error;

/// Result type for cost prediction.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur while predicting mutation counts.
///
/// Every failure is a programmer error in the operation or the schema: it
/// fails fast and is never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Invalid schema reference on table {table}: {violation}")]
    InvalidSchema { table: String, violation: Violation },
}

/// What an operation got wrong about the schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("table is not declared")]
    UnknownTable,

    #[error("column {0} is not declared")]
    UnknownColumn(String),

    #[error("update touches no column")]
    EmptyUpdate,

    #[error("primary key column {0} is missing or NULL")]
    MissingKeyColumn(String),

    #[error("key has {actual} parts, expected {expected}")]
    KeyArity { expected: usize, actual: usize },

    #[error("{0} is not directly interleaved in this table")]
    NotInterleavedChild(String),
}

impl MutationError {
    fn invalid(table: impl Into<String>, violation: Violation) -> Self {
        Self::InvalidSchema {
            table: table.into(),
            violation,
        }
    }

    pub fn unknown_table(table: impl Into<String>) -> Self {
        Self::invalid(table, Violation::UnknownTable)
    }

    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::invalid(table, Violation::UnknownColumn(column.into()))
    }

    pub fn empty_update(table: impl Into<String>) -> Self {
        Self::invalid(table, Violation::EmptyUpdate)
    }

    pub fn missing_key_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::invalid(table, Violation::MissingKeyColumn(column.into()))
    }

    pub fn key_arity(table: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::invalid(table, Violation::KeyArity { expected, actual })
    }

    pub fn not_interleaved_child(table: impl Into<String>, child: impl Into<String>) -> Self {
        Self::invalid(table, Violation::NotInterleavedChild(child.into()))
    }

    /// The violation behind this error.
    pub fn violation(&self) -> &Violation {
        match self {
            Self::InvalidSchema { violation, .. } => violation,
        }
    }
}
