//! mutcount Registry
//!
//! Declarative schema model: tables, columns, secondary indexes (simple,
//! composite, storing, NULL-filtered) and parent/child interleaving.
//!
//! A `Schema` is built once through `SchemaBuilder` and is immutable
//! afterwards; the cost calculator, the batch generator and the reference
//! store all read from the same `Schema`.

mod builder;
mod schema;
mod types;

pub use builder::{SchemaBuilder, SchemaError, TableBuilder};
pub use schema::Schema;
pub use types::{ColumnDef, ColumnType, ColumnUsage, IndexDef, InterleaveDef, TableDef};
