use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A single resource movement within an entry.
///
/// Amounts are exact 128-bit integers. Resource bookkeeping must never drift,
/// so there is deliberately no floating-point representation anywhere in
/// this type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceDelta {
    /// Resource identifier (e.g. `"grain"`, `"iron-ore"`).
    pub resource: String,
    /// Exact integer amount, in `unit`s.
    pub amount: i128,
    /// Optional unit label (e.g. `"bushel"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ResourceDelta {
    /// Create a delta without a unit.
    pub fn new(resource: impl Into<String>, amount: i128) -> Self {
        Self {
            resource: resource.into(),
            amount,
            unit: None,
        }
    }

    /// Create a delta with a unit label.
    pub fn with_unit(resource: impl Into<String>, amount: i128, unit: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            amount,
            unit: Some(unit.into()),
        }
    }

    /// Validate this delta: the resource id must be non-empty.
    ///
    /// Amounts are exact integers by construction, so the only invalid state
    /// left to check is an empty id.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.resource.is_empty() {
            return Err(TypeError::EmptyResourceId);
        }
        Ok(())
    }
}
