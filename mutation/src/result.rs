//! Predicted mutation counts.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// How the store counts mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostModel {
    /// One mutation per row write plus one per maintained index entry.
    #[default]
    Row,
    /// One mutation per written cell plus index maintenance, as measured on
    /// the column-counting store generation.
    Cell,
}

impl fmt::Display for CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostModel::Row => f.write_str("row"),
            CostModel::Cell => f.write_str("cell"),
        }
    }
}

/// Predicted mutation count of one operation, split by where it comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationCost {
    /// Base table write.
    pub base: u64,
    /// Secondary index maintenance on the target table.
    pub index: u64,
    /// Interleaved child rows removed by a delete, with their indexes.
    pub cascade: u64,
}

impl MutationCost {
    pub fn new(base: u64, index: u64, cascade: u64) -> Self {
        Self {
            base,
            index,
            cascade,
        }
    }

    pub fn total(&self) -> u64 {
        self.base + self.index + self.cascade
    }
}

impl Add for MutationCost {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            base: self.base + other.base,
            index: self.index + other.index,
            cascade: self.cascade + other.cascade,
        }
    }
}

impl AddAssign for MutationCost {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sum for MutationCost {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for MutationCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (base {} + index {} + cascade {})",
            self.total(),
            self.base,
            self.index,
            self.cascade
        )
    }
}
