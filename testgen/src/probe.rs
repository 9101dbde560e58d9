//! Boundary targets around a declared limit.

use crate::error::{GenError, GenResult};

/// The two satisfiable targets that straddle a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryProbe {
    pub unit_cost: u64,
    /// Largest multiple of `unit_cost` that does not exceed the limit.
    pub at_or_below: u64,
    /// Smallest multiple of `unit_cost` above the limit.
    pub above: u64,
}

impl BoundaryProbe {
    /// Fails when no positive multiple of `unit_cost` fits under `limit`.
    pub fn around(limit: u64, unit_cost: u64) -> GenResult<Self> {
        if unit_cost == 0 {
            return Err(GenError::unsatisfiable(limit, unit_cost));
        }
        let at_or_below = (limit / unit_cost) * unit_cost;
        if at_or_below == 0 {
            return Err(GenError::unsatisfiable(limit, unit_cost));
        }
        Ok(Self {
            unit_cost,
            at_or_below,
            above: at_or_below + unit_cost,
        })
    }

    pub fn units_at_or_below(&self) -> u64 {
        self.at_or_below / self.unit_cost
    }

    pub fn units_above(&self) -> u64 {
        self.above / self.unit_cost
    }
}
