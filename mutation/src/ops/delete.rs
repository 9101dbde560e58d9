//! Delete pricing with one level of interleave cascade.

use mutcount_core::Key;
use mutcount_registry::{Schema, TableDef};

use crate::error::{MutationError, MutationResult};
use crate::result::{CostModel, MutationCost};
use crate::validation;
use crate::{CascadedRow, RowImage};

fn populated_indexes(table: &TableDef, image: &RowImage) -> u64 {
    table
        .indexes
        .iter()
        .filter(|index| index.is_populated(|c| image.is_set(c)))
        .count() as u64
}

/// Price one deleted row and the interleaved child rows it cascades to.
///
/// Cascaded children are only looked at one level deep. Under the cell
/// model the child rows go as a single range and only their index entries
/// are counted.
pub fn delete_cost(
    schema: &Schema,
    table: &TableDef,
    key: &Key,
    image: &RowImage,
    cascade: &[CascadedRow],
    model: CostModel,
) -> MutationResult<MutationCost> {
    if key.len() != table.primary_key.len() {
        return Err(MutationError::key_arity(
            &table.name,
            table.primary_key.len(),
            key.len(),
        ));
    }
    validation::validate_image(table, image)?;

    let index = populated_indexes(table, image);

    let mut cascaded = 0u64;
    for row in cascade {
        let child = validation::resolve_cascade(schema, table, row)?;
        let child_row = match model {
            CostModel::Row => 1,
            CostModel::Cell => 0,
        };
        cascaded += child_row + populated_indexes(child, &row.image);
    }

    Ok(MutationCost::new(1, index, cascaded))
}
