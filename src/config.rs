use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

const MAX_TIMEOUT_MS: u64 = i32::MAX as u64;

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_collect_interval")]
    pub collect_interval: u64,
    pub exporter: Exporter,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
    #[serde(default)]
    pub publish: PublishConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        config_str.parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        for target in &self.targets {
            target.base_url()?;
            target.timeout()?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

/// One Elasticsearch cluster to poll
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TargetConfig {
    /// Label attached to every published point, defaults to the URL
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl TargetConfig {
    /// Cluster URL without trailing slash
    pub fn base_url(&self) -> Result<String, ConfigError> {
        let url = match (&self.url, &self.host, self.port) {
            (Some(url), _, _) if !url.trim().is_empty() => url.trim().to_string(),
            (_, Some(host), Some(port)) if !host.is_empty() => {
                format!("{}://{}:{}", self.protocol, host, port)
            }
            _ => return Err(ConfigError::IncompleteTarget(self.label())),
        };
        Ok(url.trim_end_matches('/').to_string())
    }

    /// Request timeout, `None` when `timeout_ms` is 0
    pub fn timeout(&self) -> Result<Option<Duration>, ConfigError> {
        if self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Timeout {
                actual: self.timeout_ms,
                max: MAX_TIMEOUT_MS,
            });
        }
        if self.timeout_ms == 0 {
            return Ok(None);
        }
        Ok(Some(Duration::from_millis(self.timeout_ms)))
    }

    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.url
            .clone()
            .or_else(|| self.host.clone())
            .unwrap_or_else(|| "unnamed".to_string())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PublishConfig {
    /// Backend measurement names every metric is written to
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub enum Exporter {
    #[serde(rename = "influxdb")]
    InfluxDB(InfluxDBConfig),
}

#[derive(Deserialize, Debug)]
pub struct InfluxDBConfig {
    pub url: String,
    // V2 fields
    pub bucket: Option<String>,
    pub org: Option<String>,
    pub token: Option<String>,
    // V1 fields
    pub db: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

fn default_collect_interval() -> u64 {
    60
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_groups() -> Vec<String> {
    vec!["elasticsearch".to_string()]
}
