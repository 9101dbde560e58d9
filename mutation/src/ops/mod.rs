//! Per-operation cost rules.
//!
//! Each kind of logical write (insert, update, delete) is priced in its own
//! module. Every rule validates its operation against the schema first and
//! then counts for the selected [`CostModel`](crate::CostModel).

mod delete;
mod insert;
mod update;

pub use delete::delete_cost;
pub use insert::insert_cost;
pub use update::update_cost;
