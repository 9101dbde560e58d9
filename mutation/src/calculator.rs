//! Mutation cost calculator - coordinates the per-operation rules.
//!
//! The calculator delegates to the pricing modules in `ops/`:
//! - `ops/insert.rs` - inserted rows
//! - `ops/update.rs` - updated rows
//! - `ops/delete.rs` - deleted rows with interleave cascade

use mutcount_registry::Schema;
use tracing::debug;

use crate::error::MutationResult;
use crate::ops;
use crate::result::{CostModel, MutationCost};
use crate::validation;
use crate::{LogicalOperation, MutationBatch};

/// Predicts how many mutations the store will count for a write.
///
/// Pure and deterministic: the same schema, model and operation always give
/// the same count.
#[derive(Debug, Clone, Copy)]
pub struct CostCalculator<'s> {
    schema: &'s Schema,
    model: CostModel,
}

impl<'s> CostCalculator<'s> {
    /// Create a calculator using the row cost model.
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_model(schema, CostModel::default())
    }

    pub fn with_model(schema: &'s Schema, model: CostModel) -> Self {
        Self { schema, model }
    }

    pub fn model(&self) -> CostModel {
        self.model
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Price one operation, split into base, index and cascade parts.
    pub fn breakdown(&self, op: &LogicalOperation) -> MutationResult<MutationCost> {
        let table = validation::resolve_table(self.schema, op.table())?;
        let cost = match op {
            LogicalOperation::Insert { values, .. } => ops::insert_cost(table, values, self.model)?,
            LogicalOperation::Update { values, .. } => ops::update_cost(table, values, self.model)?,
            LogicalOperation::Delete {
                key,
                image,
                cascade,
                ..
            } => ops::delete_cost(self.schema, table, key, image, cascade, self.model)?,
        };
        debug!(
            table = %table.name,
            kind = %op.kind(),
            model = %self.model,
            %cost,
            "predicted operation"
        );
        Ok(cost)
    }

    /// Predicted mutation count of one operation.
    pub fn predict(&self, op: &LogicalOperation) -> MutationResult<u64> {
        self.breakdown(op).map(|cost| cost.total())
    }

    /// Predicted mutation count of a whole batch. Fails on the first invalid
    /// operation.
    pub fn predict_batch(&self, batch: &MutationBatch) -> MutationResult<u64> {
        let mut total = MutationCost::default();
        for op in batch {
            total += self.breakdown(op)?;
        }
        debug!(ops = batch.len(), %total, "predicted batch");
        Ok(total.total())
    }
}
