//! mutcount Core Types
//!
//! This crate provides the foundational types used throughout mutcount:
//! - Identity types (TableId)
//! - Value types (the Value enum with the scalar and array cell types)
//! - Primary keys (Key) and row maps (Row)
//! - Message constants shared by the store and the harness

mod id;
mod key;
pub mod messages;
mod value;

pub use id::*;
pub use key::*;
pub use value::*;
