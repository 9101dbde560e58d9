//! Common messages and limits used across mutcount components.
//!
//! These constants keep the reference store and the harness configuration
//! in agreement about the limit-exceeded signal.

/// Error text the store uses when a transaction exceeds its mutation limit.
pub const TOO_MANY_MUTATIONS: &str = "The transaction contains too many mutations";

/// Per-transaction mutation limit enforced by the modeled store.
pub const DEFAULT_MUTATION_LIMIT: u64 = 20_000;

/// Error: a row with the same primary key already exists.
pub const ERR_ROW_EXISTS: &str = "Row already exists";

/// Error: the row addressed by an update does not exist.
pub const ERR_ROW_NOT_FOUND: &str = "Row not found";

/// Error: a NOT NULL column was left NULL.
pub const ERR_NOT_NULL: &str = "Cannot write NULL into a NOT NULL column";

/// Error: the interleaved parent row does not exist.
pub const ERR_PARENT_NOT_FOUND: &str = "Parent row is missing";
