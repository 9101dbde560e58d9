//! Transaction buffer for staging row writes over committed data.

use std::collections::{BTreeMap, HashMap};

use mutcount_core::{Key, Row, TableId};

/// Committed rows, per table, ordered by primary key.
pub type TableRows = HashMap<TableId, BTreeMap<Key, Row>>;

/// Tracks the uncommitted writes of one batch.
///
/// Reads see the staged writes first and fall back to the committed rows,
/// so later mutations in a batch observe earlier ones. Nothing reaches the
/// committed rows until [`TransactionBuffer::into_writes`] is applied.
#[derive(Debug)]
pub struct TransactionBuffer<'c> {
    committed: &'c TableRows,
    /// `None` marks a staged delete.
    pending: HashMap<TableId, BTreeMap<Key, Option<Row>>>,
}

impl<'c> TransactionBuffer<'c> {
    pub fn new(committed: &'c TableRows) -> Self {
        Self {
            committed,
            pending: HashMap::new(),
        }
    }

    /// Current row under `key`, staged writes included.
    pub fn get(&self, table: TableId, key: &Key) -> Option<&Row> {
        if let Some(staged) = self.pending.get(&table).and_then(|rows| rows.get(key)) {
            return staged.as_ref();
        }
        self.committed.get(&table)?.get(key)
    }

    pub fn contains(&self, table: TableId, key: &Key) -> bool {
        self.get(table, key).is_some()
    }

    /// Stage a row write.
    pub fn put(&mut self, table: TableId, key: Key, row: Row) {
        self.pending.entry(table).or_default().insert(key, Some(row));
    }

    /// Stage a row delete.
    pub fn remove(&mut self, table: TableId, key: Key) {
        self.pending.entry(table).or_default().insert(key, None);
    }

    /// Keys of every live row in `table` whose key starts with `prefix`.
    pub fn keys_with_prefix(&self, table: TableId, prefix: &Key) -> Vec<Key> {
        let mut keys: BTreeMap<Key, bool> = BTreeMap::new();
        if let Some(rows) = self.committed.get(&table) {
            for key in rows
                .range(prefix.clone()..)
                .map(|(k, _)| k)
                .take_while(|k| k.starts_with(prefix))
            {
                keys.insert(key.clone(), true);
            }
        }
        if let Some(rows) = self.pending.get(&table) {
            for (key, row) in rows
                .range(prefix.clone()..)
                .take_while(|(k, _)| k.starts_with(prefix))
            {
                keys.insert(key.clone(), row.is_some());
            }
        }
        keys.into_iter()
            .filter(|(_, live)| *live)
            .map(|(key, _)| key)
            .collect()
    }

    /// Number of staged writes.
    pub fn len(&self) -> usize {
        self.pending.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release the committed rows and hand back the staged writes.
    pub fn into_writes(self) -> HashMap<TableId, BTreeMap<Key, Option<Row>>> {
        self.pending
    }
}

/// Apply staged writes to the committed rows.
pub(crate) fn commit_writes(
    committed: &mut TableRows,
    writes: HashMap<TableId, BTreeMap<Key, Option<Row>>>,
) {
    for (table, rows) in writes {
        let stored = committed.entry(table).or_default();
        for (key, row) in rows {
            match row {
                Some(row) => {
                    stored.insert(key, row);
                }
                None => {
                    stored.remove(&key);
                }
            }
        }
    }
}
