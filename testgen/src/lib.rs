//! Boundary batch generation for mutcount
//!
//! This crate builds write batches whose predicted mutation count lands
//! exactly on a chosen target:
//! - Fresh, reproducible primary keys for every generated row
//! - Uniform row shapes so every unit of a batch costs the same
//! - Setup inserts for update and delete cases, chunked under a budget
//! - Matched parent and child pairs for interleaved tables
//! - Boundary probes at and just above a declared limit

pub mod config;
pub mod error;
pub mod generator;
pub mod keys;
pub mod probe;
pub mod shape;

pub use config::GeneratorConfig;
pub use error::{GenError, GenResult};
pub use generator::{BatchGenerator, GeneratedBatch};
pub use keys::KeyAllocator;
pub use probe::BoundaryProbe;
pub use shape::{placeholder, RowShape};
