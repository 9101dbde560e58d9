//! Insert pricing.

use mutcount_core::Row;
use mutcount_registry::TableDef;

use crate::error::MutationResult;
use crate::result::{CostModel, MutationCost};
use crate::validation;

/// Price one inserted row.
///
/// Every secondary index receives an entry, whether or not its key columns
/// are NULL in the new row.
pub fn insert_cost(
    table: &TableDef,
    values: &Row,
    model: CostModel,
) -> MutationResult<MutationCost> {
    validation::validate_write(table, values)?;

    let index = table.index_count() as u64;
    let base = match model {
        CostModel::Row => 1,
        CostModel::Cell => values.len() as u64,
    };

    Ok(MutationCost::new(base, index, 0))
}
