//! In-process reference store.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mutcount_core::messages::{
    DEFAULT_MUTATION_LIMIT, ERR_NOT_NULL, ERR_PARENT_NOT_FOUND, ERR_ROW_NOT_FOUND,
    TOO_MANY_MUTATIONS,
};
use mutcount_core::{Key, Row, Value};
use mutcount_mutation::{key_of, CostModel, MutationError};
use mutcount_registry::{Schema, TableDef};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::buffer::{commit_writes, TableRows, TransactionBuffer};
use crate::counter::MutationCounter;
use crate::error::{StoreError, StoreResult};
use crate::sink::{CommitMarker, MutationSink};
use crate::RowMutation;

/// Limits and counting rules of a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Largest mutation count a single batch may carry.
    pub mutation_limit: u64,
    /// Leading text of the limit-exceeded error.
    pub limit_signal: String,
    pub cost_model: CostModel,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mutation_limit: DEFAULT_MUTATION_LIMIT,
            limit_signal: TOO_MANY_MUTATIONS.to_string(),
            cost_model: CostModel::Row,
        }
    }
}

impl StoreConfig {
    pub fn with_limit(mut self, mutation_limit: u64) -> Self {
        self.mutation_limit = mutation_limit;
        self
    }

    pub fn with_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }
}

#[derive(Debug, Default)]
struct StoreState {
    tables: TableRows,
    sequence: u64,
    faults: VecDeque<StoreError>,
}

/// A [`MutationSink`] that keeps rows in memory.
///
/// Batches apply all-or-nothing. Mutations are counted by a
/// [`MutationCounter`] from the rows the batch writes and removes, never
/// from the operations' own description of them.
#[derive(Debug)]
pub struct MemoryStore {
    schema: Arc<Schema>,
    config: StoreConfig,
    latency: Option<Duration>,
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_config(schema, StoreConfig::default())
    }

    pub fn with_config(schema: Arc<Schema>, config: StoreConfig) -> Self {
        Self {
            schema,
            config,
            latency: None,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Delay every `apply` by `latency` before it is processed.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Make the next `apply` fail with `error` without touching any row.
    pub async fn fail_next(&self, error: StoreError) {
        self.state.lock().await.faults.push_back(error);
    }

    /// Read a committed row.
    pub async fn row(&self, table: &str, key: &Key) -> Option<Row> {
        let id = self.schema.get_table_id(table)?;
        let state = self.state.lock().await;
        state.tables.get(&id)?.get(key).cloned()
    }

    pub async fn row_count(&self, table: &str) -> usize {
        let Some(id) = self.schema.get_table_id(table) else {
            return 0;
        };
        let state = self.state.lock().await;
        state.tables.get(&id).map(|rows| rows.len()).unwrap_or(0)
    }

    /// Number of committed batches.
    pub async fn commit_count(&self) -> u64 {
        self.state.lock().await.sequence
    }

    fn table(&self, name: &str) -> StoreResult<&TableDef> {
        self.schema
            .get_table_by_name(name)
            .ok_or_else(|| StoreError::Schema(MutationError::unknown_table(name)))
    }

    /// Count one mutation from the rows it touches and stage its effect.
    fn stage(
        &self,
        counter: &MutationCounter,
        buffer: &mut TransactionBuffer<'_>,
        mutation: RowMutation,
        sequence: u64,
    ) -> StoreResult<u64> {
        let table = self.table(mutation.table())?;
        match mutation {
            RowMutation::Insert { values, .. } => {
                check_columns(table, &values)?;
                let key = self.key(table, &values)?;
                if buffer.contains(table.id, &key) {
                    return Err(StoreError::already_exists(&table.name, key));
                }
                self.check_parent(buffer, table, &key)?;
                let count = counter.inserted(table, &values);
                let row = resolve_commit_timestamps(table, values, sequence)?;
                check_not_null(table, &row)?;
                buffer.put(table.id, key, row);
                Ok(count)
            }
            RowMutation::Update { values, .. } => {
                check_columns(table, &values)?;
                if values.keys().all(|c| table.is_key_column(c)) {
                    return Err(StoreError::Schema(MutationError::empty_update(&table.name)));
                }
                let key = self.key(table, &values)?;
                let mut row = buffer.get(table.id, &key).cloned().ok_or_else(|| {
                    StoreError::not_found(&table.name, key.clone(), ERR_ROW_NOT_FOUND)
                })?;
                let count = counter.updated(table, &values);
                row.extend(resolve_commit_timestamps(table, values, sequence)?);
                check_not_null(table, &row)?;
                buffer.put(table.id, key, row);
                Ok(count)
            }
            RowMutation::Delete { key, .. } => {
                if key.len() != table.primary_key.len() {
                    return Err(StoreError::Schema(MutationError::key_arity(
                        &table.name,
                        table.primary_key.len(),
                        key.len(),
                    )));
                }
                let mut count = counter.removed(table, buffer.get(table.id, &key));
                for child in self.schema.children_of(table.id) {
                    for child_key in buffer.keys_with_prefix(child.id, &key) {
                        if let Some(row) = buffer.get(child.id, &child_key) {
                            count += counter.cascaded(child, row);
                        }
                    }
                }
                self.remove_tree(buffer, table, key);
                Ok(count)
            }
        }
    }

    fn key(&self, table: &TableDef, values: &Row) -> StoreResult<Key> {
        key_of(table, values).ok_or_else(|| {
            let column = table
                .primary_key
                .iter()
                .find(|c| values.get(*c).map(Value::is_null).unwrap_or(true))
                .cloned()
                .unwrap_or_default();
            StoreError::Schema(MutationError::missing_key_column(&table.name, column))
        })
    }

    fn check_parent(
        &self,
        buffer: &TransactionBuffer<'_>,
        table: &TableDef,
        key: &Key,
    ) -> StoreResult<()> {
        let Some(parent) = self.schema.parent_of(table.id) else {
            return Ok(());
        };
        let parent_key = key.prefix(parent.primary_key.len());
        if buffer.contains(parent.id, &parent_key) {
            Ok(())
        } else {
            Err(StoreError::not_found(&parent.name, parent_key, ERR_PARENT_NOT_FOUND))
        }
    }

    /// Remove a row and every interleaved descendant under its key.
    fn remove_tree(&self, buffer: &mut TransactionBuffer<'_>, table: &TableDef, key: Key) {
        for child in self.schema.children_of(table.id) {
            for child_key in buffer.keys_with_prefix(child.id, &key) {
                self.remove_tree(buffer, child, child_key);
            }
        }
        buffer.remove(table.id, key);
    }
}

/// Replace commit-timestamp placeholders with the commit's timestamp.
fn resolve_commit_timestamps(table: &TableDef, mut row: Row, sequence: u64) -> StoreResult<Row> {
    for (name, value) in row.iter_mut() {
        if !matches!(value, Value::CommitTimestamp) {
            continue;
        }
        let allowed = table
            .get_column(name)
            .map(|c| c.allow_commit_timestamp)
            .unwrap_or(false);
        if !allowed {
            return Err(StoreError::failed_precondition(format!(
                "Column {}.{} does not allow commit timestamps",
                table.name, name
            )));
        }
        *value = Value::Timestamp(sequence as i64);
    }
    Ok(row)
}

fn check_columns(table: &TableDef, values: &Row) -> StoreResult<()> {
    match values.keys().find(|c| !table.has_column(c)) {
        Some(column) => Err(StoreError::Schema(MutationError::unknown_column(
            &table.name,
            column,
        ))),
        None => Ok(()),
    }
}

fn check_not_null(table: &TableDef, row: &Row) -> StoreResult<()> {
    match table
        .columns
        .iter()
        .filter(|c| !c.nullable)
        .find(|c| row.get(&c.name).map(Value::is_null).unwrap_or(true))
    {
        Some(column) => Err(StoreError::failed_precondition(format!(
            "{}: {}.{}",
            ERR_NOT_NULL, table.name, column.name
        ))),
        None => Ok(()),
    }
}

#[async_trait]
impl MutationSink for MemoryStore {
    async fn apply(&self, mutations: Vec<RowMutation>) -> StoreResult<CommitMarker> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock().await;
        if let Some(fault) = state.faults.pop_front() {
            warn!(error = %fault, "injected store fault");
            return Err(fault);
        }

        let counter = MutationCounter::new(self.config.cost_model);
        let sequence = state.sequence + 1;
        let submitted = mutations.len();
        let (count, writes) = {
            let mut buffer = TransactionBuffer::new(&state.tables);
            let mut count = 0u64;
            for mutation in mutations {
                count += self.stage(&counter, &mut buffer, mutation, sequence)?;
            }
            (count, buffer.into_writes())
        };

        if count > self.config.mutation_limit {
            debug!(count, limit = self.config.mutation_limit, "batch over mutation limit");
            return Err(StoreError::invalid_argument(format!(
                "{}. Counted {} mutations, the limit is {}.",
                self.config.limit_signal, count, self.config.mutation_limit
            )));
        }

        commit_writes(&mut state.tables, writes);
        state.sequence = sequence;
        debug!(sequence, submitted, count, "committed batch");
        Ok(CommitMarker {
            sequence,
            mutation_count: count,
        })
    }
}
