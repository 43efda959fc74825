use std::time::Instant;

use serde_json::Value;

use super::{accumulate_for_node, nodes, Collector, Metric};
use crate::catalog;
use crate::measure::{Measure, DIMENSION_NODE};

/// Per-node runtime statistics from `/_nodes/stats`
#[derive(Debug, Clone)]
pub struct NodeStats {
    pub store_size: Measure,
    pub store_throttle_time: Measure,
    pub indexing_throttle_time: Measure,
    pub indexing_current: Measure,
    pub delete_current: Measure,
    pub query_current: Measure,
    pub fetch_current: Measure,
    pub scroll_current: Measure,
    pub query_cache_size: Measure,
    pub field_data_size: Measure,
    pub percolate_size: Measure,
    pub translog_size: Measure,
    pub request_cache_size: Measure,
    pub recovery_throttle_time: Measure,
    pub recovery_as_source: Measure,
    pub recovery_as_target: Measure,
    pub file_descriptor_limit: Measure,
}

impl Default for NodeStats {
    fn default() -> Self {
        let per_node = || Measure::with_dimension(DIMENSION_NODE);
        Self {
            store_size: per_node(),
            store_throttle_time: per_node(),
            indexing_throttle_time: per_node(),
            indexing_current: per_node(),
            delete_current: per_node(),
            query_current: per_node(),
            fetch_current: per_node(),
            scroll_current: per_node(),
            query_cache_size: per_node(),
            field_data_size: per_node(),
            percolate_size: per_node(),
            translog_size: per_node(),
            request_cache_size: per_node(),
            recovery_throttle_time: per_node(),
            recovery_as_source: per_node(),
            recovery_as_target: per_node(),
            file_descriptor_limit: per_node(),
        }
    }
}

impl NodeStats {
    pub fn from_document(stats: &Value) -> Self {
        let mut result = Self::default();

        for (name, node) in nodes(stats) {
            if let Some(process) = node.get("process") {
                accumulate_for_node(&mut result.file_descriptor_limit, &name, process, "max_file_descriptors");
            }

            if let Some(indices) = node.get("indices") {
                result.add_indices(&name, indices);
            }
        }

        result
    }

    fn add_indices(&mut self, name: &str, indices: &Value) {
        if let Some(store) = indices.get("store") {
            accumulate_for_node(&mut self.store_size, name, store, "size_in_bytes");
            accumulate_for_node(&mut self.store_throttle_time, name, store, "throttle_time_in_millis");
        }

        if let Some(indexing) = indices.get("indexing") {
            accumulate_for_node(&mut self.indexing_throttle_time, name, indexing, "throttle_time_in_millis");
            accumulate_for_node(&mut self.indexing_current, name, indexing, "index_current");
            accumulate_for_node(&mut self.delete_current, name, indexing, "delete_current");
        }

        if let Some(search) = indices.get("search") {
            accumulate_for_node(&mut self.query_current, name, search, "query_current");
            accumulate_for_node(&mut self.fetch_current, name, search, "fetch_current");
            accumulate_for_node(&mut self.scroll_current, name, search, "scroll_current");
        }

        if let Some(query_cache) = indices.get("query_cache") {
            accumulate_for_node(&mut self.query_cache_size, name, query_cache, "memory_size_in_bytes");
        }

        if let Some(fielddata) = indices.get("fielddata") {
            accumulate_for_node(&mut self.field_data_size, name, fielddata, "memory_size_in_bytes");
        }

        if let Some(percolate) = indices.get("percolate") {
            accumulate_for_node(&mut self.percolate_size, name, percolate, "memory_size_in_bytes");
        }

        if let Some(translog) = indices.get("translog") {
            accumulate_for_node(&mut self.translog_size, name, translog, "size_in_bytes");
        }

        if let Some(request_cache) = indices.get("request_cache") {
            accumulate_for_node(&mut self.request_cache_size, name, request_cache, "memory_size_in_bytes");
        }

        if let Some(recovery) = indices.get("recovery") {
            accumulate_for_node(&mut self.recovery_throttle_time, name, recovery, "throttle_time_in_millis");
            accumulate_for_node(&mut self.recovery_as_source, name, recovery, "current_as_source");
            accumulate_for_node(&mut self.recovery_as_target, name, recovery, "current_as_target");
        }
    }

    pub fn into_metrics(self) -> Vec<Metric> {
        vec![
            Metric::new(catalog::STORE_SIZE, self.store_size),
            Metric::new(catalog::STORE_THROTTLE_TIME, self.store_throttle_time),
            Metric::new(catalog::INDEXING_THROTTLE_TIME, self.indexing_throttle_time),
            Metric::new(catalog::INDEXING_CURRENT, self.indexing_current),
            Metric::new(catalog::DELETE_CURRENT, self.delete_current),
            Metric::new(catalog::QUERY_CURRENT, self.query_current),
            Metric::new(catalog::FETCH_CURRENT, self.fetch_current),
            Metric::new(catalog::SCROLL_CURRENT, self.scroll_current),
            Metric::new(catalog::QUERY_CACHE_SIZE, self.query_cache_size),
            Metric::new(catalog::FIELD_DATA_SIZE, self.field_data_size),
            Metric::new(catalog::PERCOLATE_SIZE, self.percolate_size),
            Metric::new(catalog::TRANSLOG_SIZE, self.translog_size),
            Metric::new(catalog::REQUEST_CACHE_SIZE, self.request_cache_size),
            Metric::new(catalog::RECOVERY_THROTTLE_TIME, self.recovery_throttle_time),
            Metric::new(catalog::RECOVERY_AS_SOURCE, self.recovery_as_source),
            Metric::new(catalog::RECOVERY_AS_TARGET, self.recovery_as_target),
            Metric::new(catalog::FILE_DESCRIPTOR_LIMIT, self.file_descriptor_limit),
        ]
    }
}

pub struct NodeStatsCollector;

impl NodeStatsCollector {
    pub fn new() -> Self {
        NodeStatsCollector
    }
}

impl Collector for NodeStatsCollector {
    fn name(&self) -> &str {
        "node_stats"
    }

    fn endpoint(&self) -> &'static str {
        "/_nodes/stats"
    }

    fn collect(&mut self, document: &Value, _now: Instant) -> Vec<Metric> {
        NodeStats::from_document(document).into_metrics()
    }
}
