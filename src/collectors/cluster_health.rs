use std::time::Instant;

use serde_json::Value;

use super::{set_float, set_integer, Collector, Metric};
use crate::catalog;
use crate::measure::Measure;

/// Cluster-wide counts from `/_cluster/health`
#[derive(Debug, Default, Clone)]
pub struct ClusterHealth {
    pub node_count: Measure,
    pub data_node_count: Measure,
    pub active_primary_shards: Measure,
    pub active_shards_percent: Measure,
    pub active_shards: Measure,
    pub relocating_shards: Measure,
    pub initializing_shards: Measure,
    pub unassigned_shards: Measure,
    pub delayed_unassigned_shards: Measure,
}

impl ClusterHealth {
    // number_of_pending_tasks, number_of_in_flight_fetch and
    // task_max_waiting_in_queue_millis are not part of the catalog
    pub fn from_document(health: &Value) -> Self {
        let mut result = Self::default();
        set_integer(&mut result.node_count, health, "number_of_nodes");
        set_integer(&mut result.data_node_count, health, "number_of_data_nodes");
        set_integer(&mut result.active_primary_shards, health, "active_primary_shards");
        set_float(&mut result.active_shards_percent, health, "active_shards_percent_as_number");
        set_integer(&mut result.active_shards, health, "active_shards");
        set_integer(&mut result.relocating_shards, health, "relocating_shards");
        set_integer(&mut result.initializing_shards, health, "initializing_shards");
        set_integer(&mut result.unassigned_shards, health, "unassigned_shards");
        set_integer(&mut result.delayed_unassigned_shards, health, "delayed_unassigned_shards");
        result
    }

    pub fn into_metrics(self) -> Vec<Metric> {
        vec![
            Metric::new(catalog::NODE_COUNT, self.node_count),
            Metric::new(catalog::DATA_NODE_COUNT, self.data_node_count),
            Metric::new(catalog::ACTIVE_PRIMARY_SHARDS, self.active_primary_shards),
            Metric::new(catalog::ACTIVE_SHARDS, self.active_shards),
            Metric::new(catalog::ACTIVE_SHARDS_PERCENT, self.active_shards_percent),
            Metric::new(catalog::RELOCATING_SHARDS, self.relocating_shards),
            Metric::new(catalog::INITIALIZING_SHARDS, self.initializing_shards),
            Metric::new(catalog::UNASSIGNED_SHARDS, self.unassigned_shards),
            Metric::new(catalog::DELAYED_UNASSIGNED_SHARDS, self.delayed_unassigned_shards),
        ]
    }
}

pub struct ClusterHealthCollector;

impl ClusterHealthCollector {
    pub fn new() -> Self {
        ClusterHealthCollector
    }
}

impl Collector for ClusterHealthCollector {
    fn name(&self) -> &str {
        "cluster_health"
    }

    fn endpoint(&self) -> &'static str {
        "/_cluster/health"
    }

    fn collect(&mut self, document: &Value, _now: Instant) -> Vec<Metric> {
        ClusterHealth::from_document(document).into_metrics()
    }
}
