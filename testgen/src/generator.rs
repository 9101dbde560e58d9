//! Batch generation at exact predicted targets.

use mutcount_core::{Key, Row};
use mutcount_mutation::{
    CascadedRow, CostCalculator, LogicalOperation, MutationBatch, OperationKind, RowImage,
};
use mutcount_registry::TableDef;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::{GenError, GenResult};
use crate::keys::KeyAllocator;
use crate::shape::{placeholder, RowShape};

/// A batch sized at an exact predicted mutation count.
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    /// Table the batch targets (the child table for interleaved pairs).
    pub table: String,
    pub kind: OperationKind,
    /// The batch under test.
    pub batch: MutationBatch,
    /// Inserts that must commit, in order, before `batch` can run.
    pub setup: Vec<MutationBatch>,
    /// Predicted cost of one unit (a row, or a parent and child pair).
    pub unit_cost: u64,
    pub units: u64,
}

impl GeneratedBatch {
    pub fn setup_ops(&self) -> usize {
        self.setup.iter().map(MutationBatch::len).sum()
    }
}

/// What one unit of a batch is made of.
enum UnitPlan<'a> {
    Row {
        table: &'a TableDef,
        shape: &'a RowShape,
    },
    Pair {
        parent: &'a TableDef,
        child: &'a TableDef,
        parent_shape: &'a RowShape,
        child_shape: &'a RowShape,
    },
}

/// The operations of one unit and the inserts they depend on.
#[derive(Default)]
struct Unit {
    ops: Vec<LogicalOperation>,
    setup: Vec<LogicalOperation>,
}

/// Builds batches whose predicted mutation count hits a target exactly.
pub struct BatchGenerator<'s> {
    calculator: CostCalculator<'s>,
    config: GeneratorConfig,
    keys: KeyAllocator,
}

impl<'s> BatchGenerator<'s> {
    pub fn new(calculator: CostCalculator<'s>, config: GeneratorConfig) -> Self {
        let keys = KeyAllocator::new(config.seed);
        Self {
            calculator,
            config,
            keys,
        }
    }

    pub fn calculator(&self) -> &CostCalculator<'s> {
        &self.calculator
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Predicted cost of one row of `kind` with `shape`.
    pub fn unit_cost(
        &mut self,
        table: &str,
        kind: OperationKind,
        shape: &RowShape,
    ) -> GenResult<u64> {
        let table = self.table(table)?;
        let unit = self.make_unit(&UnitPlan::Row { table, shape }, kind);
        self.cost_of(&unit.ops)
    }

    /// Predicted cost of one parent and child pair.
    pub fn pair_cost(
        &mut self,
        child: &str,
        kind: OperationKind,
        parent_shape: &RowShape,
        child_shape: &RowShape,
    ) -> GenResult<u64> {
        let (parent, child) = self.pair_tables(child)?;
        let plan = UnitPlan::Pair {
            parent,
            child,
            parent_shape,
            child_shape,
        };
        let unit = self.make_unit(&plan, kind);
        self.cost_of(&unit.ops)
    }

    /// Generate `target / unit_cost` rows of `kind`, each writing `shape`.
    pub fn generate(
        &mut self,
        table: &str,
        kind: OperationKind,
        shape: &RowShape,
        target: u64,
    ) -> GenResult<GeneratedBatch> {
        let table = self.table(table)?;
        self.build(&UnitPlan::Row { table, shape }, kind, target)
    }

    /// Generate matched parent and child rows of the interleaved `child`
    /// table. Deletes remove the parent and cascade to its one child.
    pub fn generate_interleaved(
        &mut self,
        child: &str,
        kind: OperationKind,
        parent_shape: &RowShape,
        child_shape: &RowShape,
        target: u64,
    ) -> GenResult<GeneratedBatch> {
        let (parent, child) = self.pair_tables(child)?;
        let plan = UnitPlan::Pair {
            parent,
            child,
            parent_shape,
            child_shape,
        };
        self.build(&plan, kind, target)
    }

    fn table(&self, name: &str) -> GenResult<&'s TableDef> {
        self.calculator
            .schema()
            .get_table_by_name(name)
            .ok_or_else(|| GenError::unknown_table(name))
    }

    fn pair_tables(&self, child: &str) -> GenResult<(&'s TableDef, &'s TableDef)> {
        let schema = self.calculator.schema();
        let child = self.table(child)?;
        let parent = schema
            .parent_of(child.id)
            .ok_or_else(|| GenError::NotInterleaved(child.name.clone()))?;
        Ok((parent, child))
    }

    fn cost_of(&self, ops: &[LogicalOperation]) -> GenResult<u64> {
        let mut total = 0;
        for op in ops {
            total += self.calculator.predict(op)?;
        }
        Ok(total)
    }

    fn build(
        &mut self,
        plan: &UnitPlan<'_>,
        kind: OperationKind,
        target: u64,
    ) -> GenResult<GeneratedBatch> {
        let first = self.make_unit(plan, kind);
        let unit_cost = self.cost_of(&first.ops)?;
        if target == 0 || unit_cost == 0 || target % unit_cost != 0 {
            return Err(GenError::unsatisfiable(target, unit_cost));
        }
        let units = target / unit_cost;

        let mut batch = MutationBatch::with_capacity(first.ops.len() * units as usize);
        let mut setup = Vec::new();
        batch.extend(first.ops);
        setup.extend(first.setup);
        for _ in 1..units {
            let unit = self.make_unit(plan, kind);
            batch.extend(unit.ops);
            setup.extend(unit.setup);
        }
        let setup = self.chunk_setup(setup)?;

        let table = match plan {
            UnitPlan::Row { table, .. } => table.name.clone(),
            UnitPlan::Pair { child, .. } => child.name.clone(),
        };
        debug!(
            table = %table,
            kind = %kind,
            unit_cost,
            units,
            setup_chunks = setup.len(),
            "generated batch"
        );
        Ok(GeneratedBatch {
            table,
            kind,
            batch,
            setup,
            unit_cost,
            units,
        })
    }

    fn make_unit(&mut self, plan: &UnitPlan<'_>, kind: OperationKind) -> Unit {
        match plan {
            UnitPlan::Row { table, shape } => {
                let key_row = self.fresh_key(table, Row::new());
                self.row_unit(table, shape, kind, key_row)
            }
            UnitPlan::Pair {
                parent,
                child,
                parent_shape,
                child_shape,
            } => {
                let parent_key = self.fresh_key(parent, Row::new());
                let child_key = self.fresh_key(child, parent_key.clone());
                match kind {
                    OperationKind::Delete => {
                        let parent_row = required_row(parent, parent_key);
                        let parent_row = parent_shape.apply_to(parent_row);
                        let child_row = child_shape.apply_to(required_row(child, child_key));
                        let cascaded =
                            CascadedRow::new(&child.name, RowImage::from_row(&child_row));
                        let delete =
                            LogicalOperation::delete(&parent.name, key_for(parent, &parent_row))
                                .with_image(RowImage::from_row(&parent_row))
                                .cascading(cascaded);
                        Unit {
                            ops: vec![delete],
                            setup: vec![
                                LogicalOperation::insert(&parent.name, parent_row),
                                LogicalOperation::insert(&child.name, child_row),
                            ],
                        }
                    }
                    _ => {
                        let mut unit = self.row_unit(parent, parent_shape, kind, parent_key);
                        let child_unit = self.row_unit(child, child_shape, kind, child_key);
                        unit.ops.extend(child_unit.ops);
                        unit.setup.extend(child_unit.setup);
                        unit
                    }
                }
            }
        }
    }

    fn row_unit(
        &self,
        table: &TableDef,
        shape: &RowShape,
        kind: OperationKind,
        key_row: Row,
    ) -> Unit {
        match kind {
            OperationKind::Insert => Unit {
                ops: vec![LogicalOperation::insert(&table.name, shape.apply_to(key_row))],
                setup: Vec::new(),
            },
            OperationKind::Update => Unit {
                ops: vec![LogicalOperation::update(&table.name, shape.apply_to(key_row.clone()))],
                setup: vec![LogicalOperation::insert(&table.name, required_row(table, key_row))],
            },
            OperationKind::Delete => {
                let stored = shape.apply_to(required_row(table, key_row));
                let delete = LogicalOperation::delete(&table.name, key_for(table, &stored))
                    .with_image(RowImage::from_row(&stored));
                Unit {
                    ops: vec![delete],
                    setup: vec![LogicalOperation::insert(&table.name, stored)],
                }
            }
        }
    }

    /// Fill the key columns of `table` missing from `row` with fresh values.
    fn fresh_key(&mut self, table: &TableDef, mut row: Row) -> Row {
        for column in &table.primary_key {
            if row.contains_key(column) {
                continue;
            }
            let column_type = table
                .get_column(column)
                .map(|c| c.column_type)
                .unwrap_or_default();
            row.insert(column.clone(), self.keys.next_value(column_type));
        }
        row.retain(|column, _| table.is_key_column(column));
        row
    }

    /// Split setup inserts into sequential chunks within the setup budget.
    /// An insert that alone exceeds the budget gets a chunk of its own.
    fn chunk_setup(&self, ops: Vec<LogicalOperation>) -> GenResult<Vec<MutationBatch>> {
        let budget = self.config.setup_budget;
        let mut chunks = Vec::new();
        let mut current = MutationBatch::new();
        let mut current_cost = 0;
        for op in ops {
            let cost = self.calculator.predict(&op)?;
            if !current.is_empty() && current_cost + cost > budget {
                chunks.push(std::mem::take(&mut current));
                current_cost = 0;
            }
            current_cost += cost;
            current.push(op);
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        Ok(chunks)
    }
}

/// The key plus every NOT NULL column, filled with type placeholders.
fn required_row(table: &TableDef, mut row: Row) -> Row {
    for column in table.required_columns() {
        if !row.contains_key(&column.name) {
            row.insert(column.name.clone(), placeholder(column));
        }
    }
    row
}

fn key_for(table: &TableDef, row: &Row) -> Key {
    Key::new(
        table
            .primary_key
            .iter()
            .filter_map(|column| row.get(column).cloned())
            .collect(),
    )
}
