//! One polling cycle against one Elasticsearch cluster.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::collectors::cluster_health::ClusterHealthCollector;
use crate::collectors::cluster_stats::ClusterStatsCollector;
use crate::collectors::node_info::NodeInfoCollector;
use crate::collectors::node_stats::NodeStatsCollector;
use crate::collectors::{Collector, Metric};
use crate::config::TargetConfig;
use crate::error::{MonitorError, Result};

/// Provides the JSON document behind a REST endpoint path
#[async_trait]
pub trait DocumentSource: Sync {
    async fn fetch(&self, path: &str) -> Result<Value>;
}

/// Fetches documents over HTTP with optional basic authentication
pub struct HttpSource {
    client: Client,
    base_url: String,
    user: Option<String>,
    password: Option<String>,
}

impl HttpSource {
    pub fn connect(target: &TargetConfig) -> Result<Self> {
        let base_url = target.base_url()?;
        let timeout = target.timeout()?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout).connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| MonitorError::Request {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url,
            user: target.user.clone().filter(|u| !u.is_empty()),
            password: target.password.clone(),
        })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);
        if let Some(user) = &self.user {
            request = request.basic_auth(user, self.password.as_ref());
        }

        let request_error = |source| MonitorError::Request {
            url: url.clone(),
            source,
        };
        let response = request.send().await.map_err(request_error)?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!("Had HTTP status {} for request: {}", status, url);
            return Err(MonitorError::Status { url: url.clone(), status });
        }

        let body = response.text().await.map_err(request_error)?;
        serde_json::from_str(&body).map_err(|source| MonitorError::Json { url, source })
    }
}

/// Polls one target; owns its collectors and therefore its counter history
pub struct Monitor {
    target: TargetConfig,
    label: String,
    collectors: Vec<Box<dyn Collector>>,
}

impl Monitor {
    pub fn new(target: TargetConfig) -> Self {
        let label = target.label();
        Self {
            target,
            label,
            collectors: vec![
                Box::new(ClusterHealthCollector::new()),
                Box::new(NodeInfoCollector::new()),
                // cluster-level FieldDataSize and QueryCacheSize must follow the per-node totals
                Box::new(NodeStatsCollector::new()),
                Box::new(ClusterStatsCollector::new()),
            ],
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs one cycle over a fresh HTTP client that is dropped when the cycle ends
    pub async fn poll(&mut self) -> Result<Vec<Metric>> {
        let source = HttpSource::connect(&self.target)?;
        info!("Polling Elasticsearch at {}", source.base_url);
        self.poll_with(&source).await
    }

    /// Fetches every collector's document in turn; the first failure aborts the cycle
    pub async fn poll_with<S: DocumentSource + ?Sized>(&mut self, source: &S) -> Result<Vec<Metric>> {
        let mut metrics = Vec::new();
        for collector in &mut self.collectors {
            let document = source.fetch(collector.endpoint()).await?;
            let collected = collector.collect(&document, Instant::now());
            debug!(
                "Collector {} produced {} measures for {}",
                collector.name(),
                collected.len(),
                self.label
            );
            metrics.extend(collected);
        }
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    struct FakeSource {
        documents: Mutex<HashMap<&'static str, Value>>,
    }

    impl FakeSource {
        fn new(doc_count: u64) -> Self {
            let mut documents = HashMap::new();
            documents.insert("/_cluster/health", json!({"number_of_nodes": 2, "number_of_data_nodes": 2}));
            documents.insert(
                "/_nodes",
                json!({"nodes": {"x": {"name": "A", "jvm": {"mem": {"heap_max_in_bytes": 100}}}}}),
            );
            documents.insert("/_cluster/stats", json!({"indices": {"count": 1, "docs": {"count": doc_count, "deleted": 0}}}));
            documents.insert(
                "/_nodes/stats",
                json!({"nodes": {"x": {"name": "A", "indices": {"store": {"size_in_bytes": 1000}}}}}),
            );
            Self {
                documents: Mutex::new(documents),
            }
        }

        fn set(&self, path: &'static str, value: Value) {
            self.documents.lock().unwrap().insert(path, value);
        }

        fn remove(&self, path: &'static str) {
            self.documents.lock().unwrap().remove(path);
        }
    }

    #[async_trait]
    impl DocumentSource for FakeSource {
        async fn fetch(&self, path: &str) -> Result<Value> {
            self.documents
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| MonitorError::Status {
                    url: path.to_string(),
                    status: StatusCode::NOT_FOUND,
                })
        }
    }

    fn find<'a>(metrics: &'a [Metric], name: &str) -> &'a Metric {
        metrics.iter().find(|m| m.name == name).unwrap()
    }

    fn target() -> TargetConfig {
        TargetConfig {
            name: Some("test".to_string()),
            url: Some("http://localhost:9200".to_string()),
            timeout_ms: 1000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_full_cycle() {
        let mut monitor = Monitor::new(target());
        let metrics = monitor.poll_with(&FakeSource::new(10)).await.unwrap();

        assert_eq!(metrics.len(), 9 + 5 + 15 + 17);
        assert!(metrics.iter().all(|m| catalog::ALL_METRICS.contains(&m.name)));
        assert_eq!(find(&metrics, catalog::NODE_COUNT).measure.value(), 2.0);
        assert_eq!(find(&metrics, catalog::MAX_HEAP).measure.breakdown().get("A"), Some(&100.0));
        assert_eq!(find(&metrics, catalog::STORE_SIZE).measure.value(), 1000.0);
        assert!(!find(&metrics, catalog::DOC_COUNT_PER_SECOND).measure.is_written());
        assert_eq!(monitor.label(), "test");
    }

    #[tokio::test]
    async fn test_rate_survives_cycles() {
        let mut monitor = Monitor::new(target());
        let source = FakeSource::new(10);
        monitor.poll_with(&source).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        source.set("/_cluster/stats", json!({"indices": {"docs": {"count": 5000, "deleted": 0}}}));
        let metrics = monitor.poll_with(&source).await.unwrap();

        let rate = &find(&metrics, catalog::DOC_COUNT_PER_SECOND).measure;
        assert!(rate.is_written());
        assert!(rate.value() > 0.0);
        assert_eq!(find(&metrics, catalog::DOC_COUNT).measure.value(), 5000.0);
        assert!(!find(&metrics, catalog::INDEX_COUNT).measure.is_written());
    }

    #[tokio::test]
    async fn test_failing_endpoint_aborts_cycle() {
        let mut monitor = Monitor::new(target());
        let source = FakeSource::new(10);
        source.remove("/_nodes/stats");

        let result = monitor.poll_with(&source).await;
        assert!(matches!(result, Err(MonitorError::Status { ref url, .. }) if url == "/_nodes/stats"));
    }

    #[tokio::test]
    async fn test_cluster_totals_written_after_node_totals() {
        let mut monitor = Monitor::new(target());
        let source = FakeSource::new(10);
        source.set(
            "/_cluster/stats",
            json!({"indices": {"fielddata": {"memory_size_in_bytes": 500}, "query_cache": {"memory_size_in_bytes": 70}}}),
        );
        source.set(
            "/_nodes/stats",
            json!({"nodes": {"x": {"name": "A", "indices": {
                "fielddata": {"memory_size_in_bytes": 100},
                "query_cache": {"memory_size_in_bytes": 30}
            }}}}),
        );

        let metrics = monitor.poll_with(&source).await.unwrap();
        for (name, cluster_value) in [(catalog::FIELD_DATA_SIZE, 500.0), (catalog::QUERY_CACHE_SIZE, 70.0)] {
            let written: Vec<&Metric> = metrics.iter().filter(|m| m.name == name).collect();
            assert_eq!(written.len(), 2);
            assert_eq!(written[0].measure.dimension(), Some("Node"));
            assert_eq!(written[1].measure.value(), cluster_value);
        }
    }

    /// Answers a single HTTP request with `status` and `body`, returning the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).to_lowercase()
        });

        (url, handle)
    }

    fn local_target(url: String) -> TargetConfig {
        TargetConfig {
            name: Some("local".to_string()),
            url: Some(url),
            timeout_ms: 5000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_http_source_non_200_is_an_error() {
        let (url, server) = serve_once("503 Service Unavailable", "{}").await;
        let source = HttpSource::connect(&local_target(url)).unwrap();

        let result = source.fetch("/_cluster/health").await;
        assert!(matches!(
            result,
            Err(MonitorError::Status { status, .. }) if status == StatusCode::SERVICE_UNAVAILABLE
        ));

        let request = server.await.unwrap();
        assert!(request.starts_with("get /_cluster/health "));
        assert!(!request.contains("authorization:"));
    }

    #[tokio::test]
    async fn test_http_source_malformed_json_is_an_error() {
        let (url, server) = serve_once("200 OK", "{not json").await;
        let source = HttpSource::connect(&local_target(url)).unwrap();

        let result = source.fetch("/_nodes").await;
        assert!(matches!(result, Err(MonitorError::Json { ref url, .. }) if url.ends_with("/_nodes")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_source_sends_basic_auth() {
        let (url, server) = serve_once("200 OK", r#"{"status":"green"}"#).await;
        let target = TargetConfig {
            user: Some("monitor".to_string()),
            password: Some("pw".to_string()),
            ..local_target(url)
        };
        let source = HttpSource::connect(&target).unwrap();

        let document = source.fetch("/_cluster/health").await.unwrap();
        assert_eq!(document["status"], "green");

        // base64("monitor:pw")
        let request = server.await.unwrap();
        assert!(request.contains("authorization: basic bw9uaxrvcjpwdw=="));
    }

    #[tokio::test]
    async fn test_poll_fails_on_unavailable_cluster() {
        let (url, server) = serve_once("503 Service Unavailable", "{}").await;
        let mut monitor = Monitor::new(local_target(url));

        let result = monitor.poll().await;
        assert!(matches!(result, Err(MonitorError::Status { .. })));
        server.await.unwrap();
    }

    #[test]
    fn test_http_source_rejects_incomplete_target() {
        let result = HttpSource::connect(&TargetConfig::default());
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }
}
