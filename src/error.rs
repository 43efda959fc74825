//! Error types for esmetrics

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of one polling cycle
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Had HTTP status {status} for request: {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No [[targets]] configured")]
    NoTargets,

    #[error("Target needs either <url> or <host> and <port>: {0}")]
    IncompleteTarget(String),

    #[error("Timeout needs to be in range [0,{max}], got {actual}")]
    Timeout { actual: u64, max: u64 },
}

/// Raised when a measure cannot be handed to the backend
#[derive(Error, Debug, PartialEq)]
pub enum PublishError {
    #[error("Measure {metric} has {entries} breakdown entries but no dimension name")]
    MissingDimension { metric: String, entries: usize },
}

pub type Result<T> = std::result::Result<T, MonitorError>;
