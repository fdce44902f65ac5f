use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Logical clock for ledger events.
///
/// Time in the simulation advances in `(day, tick)` steps, with an optional
/// `global_tick` counter that is monotonic across the whole run. When both
/// operands of a comparison carry `global_tick`, it is authoritative and the
/// `(day, tick)` pair is ignored; otherwise comparison falls back to
/// `(day, tick)` lexicographic order.
///
/// Because the comparison rule depends on the operand pair, `GameTime` does
/// not implement `Ord`; use [`GameTime::logical_cmp`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameTime {
    /// Simulation day.
    pub day: u64,
    /// Tick within the day.
    pub tick: u32,
    /// Monotonic tick across the whole run, if tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_tick: Option<u64>,
}

impl GameTime {
    /// Create a time without a global tick.
    pub const fn new(day: u64, tick: u32) -> Self {
        Self {
            day,
            tick,
            global_tick: None,
        }
    }

    /// Create a time with an explicit global tick.
    pub const fn at_global_tick(day: u64, tick: u32, global_tick: u64) -> Self {
        Self {
            day,
            tick,
            global_tick: Some(global_tick),
        }
    }

    /// The zero time (day 0, tick 0, no global tick).
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Compare two times under the ledger's ordering rule.
    ///
    /// If both carry `global_tick`, those are compared exclusively;
    /// otherwise `(day, tick)` lexicographic order applies.
    pub fn logical_cmp(&self, other: &Self) -> Ordering {
        match (self.global_tick, other.global_tick) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => (self.day, self.tick).cmp(&(other.day, other.tick)),
        }
    }

    /// Returns `true` if this time is at or after `other`.
    pub fn is_at_or_after(&self, other: &Self) -> bool {
        self.logical_cmp(other) != Ordering::Less
    }

    /// Returns `true` if this time is at or before `other`.
    pub fn is_at_or_before(&self, other: &Self) -> bool {
        self.logical_cmp(other) != Ordering::Greater
    }
}
