//! Update pricing.

use mutcount_core::Row;
use mutcount_registry::TableDef;

use crate::error::{MutationError, MutationResult};
use crate::result::{CostModel, MutationCost};
use crate::validation;

/// Price one updated row.
///
/// Only indexes whose key intersects the touched columns are rewritten.
/// Under the cell model a rewritten entry costs two (old entry removed, new
/// entry written) and an index that merely stores a touched column costs one.
pub fn update_cost(
    table: &TableDef,
    values: &Row,
    model: CostModel,
) -> MutationResult<MutationCost> {
    validation::validate_write(table, values)?;

    let touched: Vec<&str> = values
        .keys()
        .map(String::as_str)
        .filter(|c| !table.is_key_column(c))
        .collect();
    if touched.is_empty() {
        return Err(MutationError::empty_update(&table.name));
    }

    let mut key_touched = 0u64;
    let mut stored_touched = 0u64;
    for index in &table.indexes {
        if touched.iter().any(|c| index.has_key_column(c)) {
            key_touched += 1;
        } else if touched.iter().any(|c| index.has_stored_column(c)) {
            stored_touched += 1;
        }
    }

    let cost = match model {
        CostModel::Row => MutationCost::new(1, key_touched, 0),
        CostModel::Cell => {
            MutationCost::new(values.len() as u64, key_touched * 2 + stored_touched, 0)
        }
    };
    Ok(cost)
}
