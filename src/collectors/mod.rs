pub mod cluster_health;
pub mod cluster_stats;
pub mod node_info;
pub mod node_stats;

use std::time::Instant;

use serde_json::Value;

use crate::measure::Measure;

/// Placeholder used when a node does not report its name
pub const UNKNOWN_NODE: &str = "unknown-node";

// A measure ready to be published under a catalog name
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: &'static str,
    pub measure: Measure,
}

impl Metric {
    pub fn new(name: &'static str, measure: Measure) -> Self {
        Self { name, measure }
    }
}

pub trait Collector: Send {
    fn name(&self) -> &str;

    /// Path of the REST endpoint this collector reads, relative to the cluster URL
    fn endpoint(&self) -> &'static str;

    fn collect(&mut self, document: &Value, now: Instant) -> Vec<Metric>;
}

/// Reads an integer field, truncating floats. Missing or non-numeric fields yield `None`.
pub(crate) fn read_integer(parent: &Value, key: &str) -> Option<f64> {
    match parent.get(key)? {
        Value::Number(number) => number
            .as_i64()
            .map(|v| v as f64)
            .or_else(|| number.as_u64().map(|v| v as f64))
            .or_else(|| number.as_f64().map(f64::trunc)),
        _ => None,
    }
}

/// Reads a floating-point field. Missing or non-numeric fields yield `None`.
pub(crate) fn read_float(parent: &Value, key: &str) -> Option<f64> {
    parent.get(key)?.as_f64()
}

pub(crate) fn set_integer(measure: &mut Measure, parent: &Value, key: &str) {
    if let Some(value) = read_integer(parent, key) {
        measure.set_value(value);
    }
}

pub(crate) fn set_float(measure: &mut Measure, parent: &Value, key: &str) {
    if let Some(value) = read_float(parent, key) {
        measure.set_value(value);
    }
}

/// Adds the float field `key` to the breakdown entry of the same name
pub(crate) fn add_breakdown_float(measure: &mut Measure, parent: &Value, key: &str) {
    if let Some(value) = read_float(parent, key) {
        measure.add_breakdown(key, value);
    }
}

/// Sums an integer field into the total and into the breakdown entry for `node`
pub(crate) fn accumulate_for_node(measure: &mut Measure, node: &str, parent: &Value, key: &str) {
    if let Some(value) = read_integer(parent, key) {
        measure.add_value(value);
        measure.add_breakdown(node, value);
    }
}

/// Iterates `root.nodes` as (resolved node name, node object) pairs
pub(crate) fn nodes<'a>(root: &'a Value) -> impl Iterator<Item = (String, &'a Value)> + 'a {
    root.get("nodes")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|nodes| nodes.values())
        .map(|node| (node_name(node), node))
}

fn node_name(node: &Value) -> String {
    match node.get("name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        None | Some(Value::Null) | Some(Value::String(_)) => UNKNOWN_NODE.to_string(),
        Some(other) => other.to_string(),
    }
}
