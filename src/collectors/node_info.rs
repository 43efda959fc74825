use std::time::Instant;

use serde_json::Value;

use super::{accumulate_for_node, nodes, Collector, Metric};
use crate::catalog;
use crate::measure::{Measure, DIMENSION_NODE};

/// JVM memory settings from `/_nodes`, summed over the cluster and broken down per node
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub init_heap: Measure,
    pub max_heap: Measure,
    pub init_non_heap: Measure,
    pub max_non_heap: Measure,
    pub max_direct: Measure,
}

impl Default for NodeInfo {
    fn default() -> Self {
        Self {
            init_heap: Measure::with_dimension(DIMENSION_NODE),
            max_heap: Measure::with_dimension(DIMENSION_NODE),
            init_non_heap: Measure::with_dimension(DIMENSION_NODE),
            max_non_heap: Measure::with_dimension(DIMENSION_NODE),
            max_direct: Measure::with_dimension(DIMENSION_NODE),
        }
    }
}

impl NodeInfo {
    pub fn from_document(info: &Value) -> Self {
        let mut result = Self::default();

        for (name, node) in nodes(info) {
            let Some(mem) = node.get("jvm").and_then(|jvm| jvm.get("mem")) else {
                continue;
            };

            accumulate_for_node(&mut result.init_heap, &name, mem, "heap_init_in_bytes");
            accumulate_for_node(&mut result.max_heap, &name, mem, "heap_max_in_bytes");
            accumulate_for_node(&mut result.init_non_heap, &name, mem, "non_heap_init_in_bytes");
            accumulate_for_node(&mut result.max_non_heap, &name, mem, "non_heap_max_in_bytes");
            accumulate_for_node(&mut result.max_direct, &name, mem, "direct_max_in_bytes");
        }

        result
    }

    pub fn into_metrics(self) -> Vec<Metric> {
        vec![
            Metric::new(catalog::INIT_HEAP, self.init_heap),
            Metric::new(catalog::MAX_HEAP, self.max_heap),
            Metric::new(catalog::INIT_NON_HEAP, self.init_non_heap),
            Metric::new(catalog::MAX_NON_HEAP, self.max_non_heap),
            Metric::new(catalog::MAX_DIRECT, self.max_direct),
        ]
    }
}

pub struct NodeInfoCollector;

impl NodeInfoCollector {
    pub fn new() -> Self {
        NodeInfoCollector
    }
}

impl Collector for NodeInfoCollector {
    fn name(&self) -> &str {
        "node_info"
    }

    fn endpoint(&self) -> &'static str {
        "/_nodes"
    }

    fn collect(&mut self, document: &Value, _now: Instant) -> Vec<Metric> {
        NodeInfo::from_document(document).into_metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::UNKNOWN_NODE;
    use serde_json::json;

    fn jvm_node(name: Option<&str>, heap_max: u64) -> Value {
        let mut node = json!({
            "version": "2.4.1",
            "jvm": {
                "mem": {
                    "heap_init_in_bytes": 268435456u64,
                    "heap_max_in_bytes": heap_max,
                    "non_heap_init_in_bytes": 2555904,
                    "non_heap_max_in_bytes": 0,
                    "direct_max_in_bytes": heap_max
                }
            }
        });
        if let Some(name) = name {
            node["name"] = json!(name);
        }
        node
    }

    #[test]
    fn test_sums_and_breaks_down_by_node_name() {
        let doc = json!({
            "cluster_name": "prod",
            "nodes": {
                "Xy1vQ": jvm_node(Some("es-1"), 1_000_000),
                "Ab9kP": jvm_node(Some("es-2"), 3_000_000)
            }
        });

        let info = NodeInfo::from_document(&doc);
        assert_eq!(info.max_heap.value(), 4_000_000.0);
        assert_eq!(info.max_heap.breakdown().get("es-1"), Some(&1_000_000.0));
        assert_eq!(info.max_heap.breakdown().get("es-2"), Some(&3_000_000.0));
        assert!(!info.max_heap.breakdown().contains_key("Xy1vQ"));
        assert_eq!(info.init_heap.value(), 2.0 * 268435456.0);
        assert_eq!(info.max_non_heap.value(), 0.0);
        assert!(info.max_non_heap.is_written());
        assert_eq!(info.max_direct.dimension(), Some("Node"));
    }

    #[test]
    fn test_unnamed_nodes_share_placeholder() {
        let doc = json!({
            "nodes": {
                "a": jvm_node(None, 100),
                "b": jvm_node(None, 200)
            }
        });

        let info = NodeInfo::from_document(&doc);
        assert_eq!(info.max_heap.breakdown().len(), 1);
        assert_eq!(info.max_heap.breakdown().get(UNKNOWN_NODE), Some(&300.0));
    }

    #[test]
    fn test_node_without_jvm_is_skipped() {
        let doc = json!({
            "nodes": {
                "a": {"name": "client-only"},
                "b": jvm_node(Some("data-1"), 500)
            }
        });

        let info = NodeInfo::from_document(&doc);
        assert_eq!(info.max_heap.value(), 500.0);
        assert!(!info.max_heap.breakdown().contains_key("client-only"));
    }

    #[test]
    fn test_missing_nodes_section() {
        let info = NodeInfo::from_document(&json!({"cluster_name": "prod"}));
        assert!(!info.init_heap.is_written());
        assert!(info.init_heap.breakdown().is_empty());
    }
}
