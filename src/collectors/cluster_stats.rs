use std::time::Instant;

use serde_json::Value;

use super::{add_breakdown_float, read_float, set_float, Collector, Metric};
use crate::catalog;
use crate::measure::{Measure, DIMENSION_STAT, DIMENSION_STATE};
use crate::rate::{RateMeasure, RateUnit};

const QUERY_CACHE_STATS: &[&str] = &[
    "total_count",
    "hit_count",
    "miss_count",
    "cache_size",
    "cache_count",
    "evictions",
];

const SEGMENT_STATS: &[&str] = &[
    "count",
    "memory_in_bytes",
    "terms_memory_in_bytes",
    "stored_fields_memory_in_bytes",
    "term_vectors_memory_in_bytes",
    "norms_memory_in_bytes",
    "doc_values_memory_in_bytes",
    "index_writer_memory_in_bytes",
    "index_writer_max_memory_in_bytes",
    "version_map_memory_in_bytes",
    "fixed_bit_set_memory_in_bytes",
];

const PERCOLATE_STATS: &[&str] = &["total", "time_in_millis", "current", "memory_size_in_bytes", "queries"];

const FILE_DESCRIPTOR_STATS: &[&str] = &["min", "max", "avg"];

const FILE_SYSTEM_STATS: &[&str] = &["total_in_bytes", "free_in_bytes", "available_in_bytes"];

/// Cluster-wide index and node aggregates from `/_cluster/stats`
#[derive(Debug, Clone)]
pub struct ClusterStats {
    pub index_count: Measure,
    pub shards: Measure,
    pub doc_count: Measure,
    pub doc_count_rate: Measure,
    pub deleted_count: Measure,
    pub deleted_count_rate: Measure,
    pub field_data_size: Measure,
    pub field_data_evictions: Measure,
    pub query_cache: Measure,
    pub completion_size: Measure,
    pub segment_count: Measure,
    pub segment_size: Measure,
    pub percolate: Measure,
    pub file_descriptors: Measure,
    pub file_system: Measure,
}

impl Default for ClusterStats {
    fn default() -> Self {
        Self {
            index_count: Measure::new(),
            shards: Measure::with_dimension(DIMENSION_STATE),
            doc_count: Measure::new(),
            doc_count_rate: Measure::new(),
            deleted_count: Measure::new(),
            deleted_count_rate: Measure::new(),
            field_data_size: Measure::new(),
            field_data_evictions: Measure::new(),
            query_cache: Measure::with_dimension(DIMENSION_STATE),
            completion_size: Measure::new(),
            segment_count: Measure::new(),
            segment_size: Measure::with_dimension(DIMENSION_STATE),
            percolate: Measure::with_dimension(DIMENSION_STATE),
            file_descriptors: Measure::with_dimension(DIMENSION_STAT),
            file_system: Measure::with_dimension(DIMENSION_STAT),
        }
    }
}

impl ClusterStats {
    pub fn into_metrics(self) -> Vec<Metric> {
        vec![
            Metric::new(catalog::INDEX_COUNT, self.index_count),
            Metric::new(catalog::SHARD_COUNT, self.shards),
            Metric::new(catalog::DOC_COUNT, self.doc_count),
            Metric::new(catalog::DELETED_COUNT, self.deleted_count),
            Metric::new(catalog::DOC_COUNT_PER_SECOND, self.doc_count_rate),
            Metric::new(catalog::DELETED_COUNT_PER_SECOND, self.deleted_count_rate),
            Metric::new(catalog::FIELD_DATA_SIZE, self.field_data_size),
            Metric::new(catalog::FIELD_DATA_EVICTIONS, self.field_data_evictions),
            Metric::new(catalog::QUERY_CACHE_SIZE, self.query_cache),
            Metric::new(catalog::COMPLETION_SIZE, self.completion_size),
            Metric::new(catalog::SEGMENT_COUNT, self.segment_count),
            Metric::new(catalog::SEGMENT_SIZE, self.segment_size),
            Metric::new(catalog::FILE_DESCRIPTOR_COUNT, self.file_descriptors),
            Metric::new(catalog::FILE_SYSTEM_SIZE, self.file_system),
            Metric::new(catalog::PERCOLATE_COUNT, self.percolate),
        ]
    }
}

/// Reads `/_cluster/stats` and keeps the document counters across cycles
pub struct ClusterStatsCollector {
    documents: RateMeasure,
    deleted: RateMeasure,
}

impl ClusterStatsCollector {
    pub fn new() -> Self {
        Self {
            documents: RateMeasure::new(RateUnit::Second),
            deleted: RateMeasure::new(RateUnit::Second),
        }
    }

    pub fn parse(&mut self, stats: &Value, now: Instant) -> ClusterStats {
        self.documents.reset_measures();
        self.deleted.reset_measures();

        let mut result = ClusterStats::default();

        if let Some(indices) = stats.get("indices") {
            self.parse_indices(indices, now, &mut result);
        }

        if let Some(nodes) = stats.get("nodes") {
            if let Some(fds) = nodes.get("process").and_then(|p| p.get("open_file_descriptors")) {
                set_float(&mut result.file_descriptors, fds, "max");
                for stat in FILE_DESCRIPTOR_STATS {
                    add_breakdown_float(&mut result.file_descriptors, fds, stat);
                }
            }

            // not reported by every version
            if let Some(fs) = nodes.get("fs") {
                set_float(&mut result.file_system, fs, "free_in_bytes");
                for stat in FILE_SYSTEM_STATS {
                    add_breakdown_float(&mut result.file_system, fs, stat);
                }
            }
        }

        result.doc_count = self.documents.base_measure().clone();
        result.doc_count_rate = self.documents.derived_measure().clone();
        result.deleted_count = self.deleted.base_measure().clone();
        result.deleted_count_rate = self.deleted.derived_measure().clone();
        result
    }

    fn parse_indices(&mut self, indices: &Value, now: Instant, result: &mut ClusterStats) {
        set_float(&mut result.index_count, indices, "count");

        if let Some(shards) = indices.get("shards") {
            set_float(&mut result.shards, shards, "total");
            add_breakdown_float(&mut result.shards, shards, "primaries");
            add_breakdown_float(&mut result.shards, shards, "replication");
        }

        if let Some(docs) = indices.get("docs") {
            if let Some(count) = read_float(docs, "count") {
                self.documents.sample(count, now);
            }
            if let Some(deleted) = read_float(docs, "deleted") {
                self.deleted.sample(deleted, now);
            }
        }

        if let Some(fielddata) = indices.get("fielddata") {
            set_float(&mut result.field_data_size, fielddata, "memory_size_in_bytes");
            set_float(&mut result.field_data_evictions, fielddata, "evictions");
        }

        if let Some(query_cache) = indices.get("query_cache") {
            set_float(&mut result.query_cache, query_cache, "memory_size_in_bytes");
            for stat in QUERY_CACHE_STATS {
                add_breakdown_float(&mut result.query_cache, query_cache, stat);
            }
        }

        if let Some(completion) = indices.get("completion") {
            set_float(&mut result.completion_size, completion, "size_in_bytes");
        }

        if let Some(segments) = indices.get("segments") {
            set_float(&mut result.segment_count, segments, "count");
            for stat in SEGMENT_STATS {
                add_breakdown_float(&mut result.segment_size, segments, stat);
            }
        }

        if let Some(percolate) = indices.get("percolate") {
            set_float(&mut result.percolate, percolate, "current");
            for stat in PERCOLATE_STATS {
                add_breakdown_float(&mut result.percolate, percolate, stat);
            }
        }
    }
}

impl Collector for ClusterStatsCollector {
    fn name(&self) -> &str {
        "cluster_stats"
    }

    fn endpoint(&self) -> &'static str {
        "/_cluster/stats"
    }

    fn collect(&mut self, document: &Value, now: Instant) -> Vec<Metric> {
        self.parse(document, now).into_metrics()
    }
}
