//! podlink configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Main podlink configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// AI engine connection
    pub engine: EngineConfig,

    /// Pods to manage
    pub pods: Vec<PodConfig>,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.engine.call_timeout_ms == 0 {
            return Err(eyre::eyre!("engine.call-timeout-ms must be greater than zero"));
        }

        let mut seen = HashSet::new();
        for pod in &self.pods {
            if pod.name.trim().is_empty() {
                return Err(eyre::eyre!("Pod name must not be empty"));
            }
            if !seen.insert(pod.name.as_str()) {
                return Err(eyre::eyre!("Duplicate pod name: {}", pod.name));
            }
        }
        Ok(())
    }

    /// Look up a pod by name
    pub fn pod(&self, name: &str) -> Option<&PodConfig> {
        self.pods.iter().find(|p| p.name == name)
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .podlink.yml
        let local_config = PathBuf::from(".podlink.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/podlink/podlink.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("podlink").join("podlink.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(p) => p.clone(),
            None => PathBuf::from(".podlink.yml"),
        };
        let content = fs::read_to_string(path).ok()?;
        serde_yaml::from_str::<Self>(&content).ok()?.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// AI engine connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Deadline for each interpretation/data call in milliseconds
    #[serde(rename = "call-timeout-ms")]
    pub call_timeout_ms: u64,

    /// Deadline for the health probe in milliseconds
    #[serde(rename = "health-timeout-ms")]
    pub health_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8004".to_string(),
            call_timeout_ms: 1000,
            health_timeout_ms: 1000,
        }
    }
}

/// A single pod's configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodConfig {
    pub name: String,

    /// Start of the pod's time window (unix seconds)
    #[serde(default)]
    pub epoch: i64,

    /// Length of the pod's time window in seconds
    #[serde(rename = "period-secs", default = "default_period_secs")]
    pub period_secs: u64,

    /// Persisted interpretations; defaults to `.pods/<name>/interpretations.json`
    #[serde(rename = "interpretations-path", default)]
    pub interpretations_path: Option<PathBuf>,

    #[serde(default)]
    pub connectors: Vec<ConnectorConfig>,
}

fn default_period_secs() -> u64 {
    // one week
    7 * 24 * 60 * 60
}

/// A data connector entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Connector kind (currently only "file")
    pub kind: String,

    /// Source path for file connectors
    #[serde(default)]
    pub path: Option<PathBuf>,
}
