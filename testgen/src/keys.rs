//! Fresh primary key values.

use mutcount_core::Value;
use mutcount_registry::ColumnType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Builder;

/// Hands out primary key values that never repeat within one allocator.
///
/// Keys are random-looking UUIDs drawn from a seeded generator, so two runs
/// with the same seed produce the same keys.
#[derive(Debug, Clone)]
pub struct KeyAllocator {
    rng: StdRng,
    issued: u64,
}

impl KeyAllocator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            issued: 0,
        }
    }

    /// A fresh UUID string.
    pub fn next_id(&mut self) -> String {
        self.next_uuid().to_string()
    }

    /// A fresh value for a key column of the given type.
    pub fn next_value(&mut self, column_type: ColumnType) -> Value {
        match column_type {
            ColumnType::Int64 => {
                self.issued += 1;
                // Low 32 bits carry the counter, so values never repeat.
                let high = self.rng.gen::<u32>() as i64 & 0x7fff_ffff;
                Value::Int((high << 32) | (self.issued as i64 & 0xffff_ffff))
            }
            ColumnType::Bytes => Value::Bytes(self.next_uuid().as_bytes().to_vec()),
            _ => Value::String(self.next_id()),
        }
    }

    /// Number of values handed out so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    fn next_uuid(&mut self) -> uuid::Uuid {
        self.issued += 1;
        let bytes: [u8; 16] = self.rng.gen();
        Builder::from_random_bytes(bytes).into_uuid()
    }
}
