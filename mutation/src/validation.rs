//! Schema checks shared by the cost operations.

use mutcount_core::Row;
use mutcount_registry::{Schema, TableDef};

use crate::error::{MutationError, MutationResult};
use crate::{CascadedRow, RowImage};

/// Resolve the target table of an operation.
pub fn resolve_table<'s>(schema: &'s Schema, name: &str) -> MutationResult<&'s TableDef> {
    schema
        .get_table_by_name(name)
        .ok_or_else(|| MutationError::unknown_table(name))
}

/// Every written column must be declared and every key column present.
pub fn validate_write(table: &TableDef, values: &Row) -> MutationResult<()> {
    if let Some(column) = values.keys().find(|c| !table.has_column(c)) {
        return Err(MutationError::unknown_column(&table.name, column));
    }
    if let Some(column) = table
        .primary_key
        .iter()
        .find(|c| values.get(*c).map(|v| v.is_null()).unwrap_or(true))
    {
        return Err(MutationError::missing_key_column(&table.name, column));
    }
    Ok(())
}

pub fn validate_image(table: &TableDef, image: &RowImage) -> MutationResult<()> {
    match image.columns().find(|c| !table.has_column(c)) {
        Some(column) => Err(MutationError::unknown_column(&table.name, column)),
        None => Ok(()),
    }
}

/// Resolve a cascaded row, which must live in a table directly interleaved
/// in `parent`.
pub fn resolve_cascade<'s>(
    schema: &'s Schema,
    parent: &TableDef,
    row: &CascadedRow,
) -> MutationResult<&'s TableDef> {
    let child = schema
        .get_table_by_name(&row.table)
        .filter(|child| schema.is_child_of(child.id, parent.id))
        .ok_or_else(|| MutationError::not_interleaved_child(&parent.name, &row.table))?;
    validate_image(child, &row.image)?;
    Ok(child)
}
