//! Scalar accumulator with an optional per-key breakdown.

use std::collections::BTreeMap;

/// Breakdown axis for per-node values
pub const DIMENSION_NODE: &str = "Node";
/// Breakdown axis for cache, shard and segment sub-values
pub const DIMENSION_STATE: &str = "State";
/// Breakdown axis for min/max/avg style aggregates
pub const DIMENSION_STAT: &str = "Stat";

/// One metric value for one polling cycle.
///
/// The base value is either overwritten (`set_value`) for cluster-wide figures or summed
/// (`add_value`) when the same field is reported once per node. The breakdown holds
/// the individual contributions keyed by node name, state or stat name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measure {
    value: f64,
    written: bool,
    dimension: Option<String>,
    breakdown: BTreeMap<String, f64>,
}

impl Measure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure whose breakdown entries are published under `dimension`
    pub fn with_dimension(dimension: &str) -> Self {
        Self {
            dimension: Some(dimension.to_string()),
            ..Self::default()
        }
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
        self.written = true;
    }

    pub fn add_value(&mut self, value: f64) {
        self.value += value;
        self.written = true;
    }

    /// Adds `value` to the breakdown entry for `key`, creating it at 0 if needed
    pub fn add_breakdown(&mut self, key: &str, value: f64) {
        *self.breakdown.entry(key.to_string()).or_insert(0.0) += value;
        self.written = true;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn dimension(&self) -> Option<&str> {
        self.dimension.as_deref()
    }

    pub fn breakdown(&self) -> &BTreeMap<String, f64> {
        &self.breakdown
    }

    /// Whether any source field reached this measure during the cycle
    pub fn is_written(&self) -> bool {
        self.written
    }
}
