//! Fans measures out into backend points.
//!
//! Every metric name is published once per configured group (a backend "handle"),
//! unless the include/exclude patterns filter it out. A measure with a breakdown
//! additionally produces one dynamic child point per key, tagged with its dimension.

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::catalog::ALL_METRICS;
use crate::collectors::Metric;
use crate::config::PublishConfig;
use crate::error::PublishError;
use crate::exporters::Point;

/// Tag carrying the polled cluster's label
pub const TARGET_TAG: &str = "target";

pub struct Publisher {
    groups: Vec<String>,
    include: GlobSet,
    exclude: GlobSet,
}

impl Publisher {
    pub fn new(config: &PublishConfig) -> Self {
        let include = build_globset(&config.include);
        let exclude = build_globset(&config.exclude);

        for pattern in &config.exclude {
            let matches_any = Glob::new(pattern)
                .map(|glob| {
                    let matcher = glob.compile_matcher();
                    ALL_METRICS.iter().any(|name| matcher.is_match(name))
                })
                .unwrap_or(false);
            if !matches_any {
                warn!("Exclude pattern '{}' matches no known metric", pattern);
            }
        }

        Publisher {
            groups: config.groups.clone(),
            include,
            exclude,
        }
    }

    /// Backend groups the metric `name` is registered under
    fn handles(&self, name: &str) -> Vec<&str> {
        if !self.include.is_empty() && !self.include.is_match(name) {
            return Vec::new();
        }
        if self.exclude.is_match(name) {
            return Vec::new();
        }
        self.groups.iter().map(String::as_str).collect()
    }

    pub fn publish(&self, target: &str, metric: &Metric, points: &mut Vec<Point>) -> Result<(), PublishError> {
        let measure = &metric.measure;
        let breakdown = measure.breakdown();

        if !breakdown.is_empty() && measure.dimension().is_none() {
            return Err(PublishError::MissingDimension {
                metric: metric.name.to_string(),
                entries: breakdown.len(),
            });
        }

        if !measure.is_written() {
            debug!("No value collected for measure '{}', leaving it stale", metric.name);
            return Ok(());
        }

        let handles = self.handles(metric.name);
        if handles.is_empty() {
            debug!("No group registered for measure '{}', skipping", metric.name);
            return Ok(());
        }

        debug!(
            "Setting measure '{}' to value {}{}",
            metric.name,
            measure.value(),
            measure
                .dimension()
                .filter(|_| !breakdown.is_empty())
                .map(|d| format!(", dynamic: {}: {:?}", d, breakdown))
                .unwrap_or_default()
        );

        let target_tag = (TARGET_TAG.to_string(), target.to_string());
        for group in handles {
            points.push(Point {
                measurement: group.to_string(),
                field: metric.name.to_string(),
                value: measure.value(),
                tags: vec![target_tag.clone()],
            });

            if let Some(dimension) = measure.dimension() {
                for (key, value) in breakdown {
                    points.push(Point {
                        measurement: group.to_string(),
                        field: metric.name.to_string(),
                        value: *value,
                        tags: vec![target_tag.clone(), (dimension.to_string(), key.clone())],
                    });
                }
            }
        }

        Ok(())
    }

    /// Publishes one cycle's metrics, failing on the first malformed measure
    pub fn publish_all(&self, target: &str, metrics: &[Metric]) -> Result<Vec<Point>, PublishError> {
        let mut points = Vec::new();
        for metric in metrics {
            self.publish(target, metric, &mut points)?;
        }
        Ok(points)
    }
}

fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => {
                warn!("Invalid metric pattern '{}': {}", pattern, e);
            }
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!("Error building metric globset: {}", e);
        GlobSet::empty()
    })
}
