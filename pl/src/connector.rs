//! Data connectors
//!
//! A connector produces `State` snapshots for its pod and reports them
//! through the `ChangeHandler` it was initialized with.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::bridge::ChangeHandler;
use crate::config::ConnectorConfig;
use crate::domain::{Observation, State};
use crate::engine::DeliveryError;

/// Errors from setting up or running a pod's connector
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("pod {pod}: failed to read {path}: {source}")]
    Read {
        pod: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pod {pod}: {path} line {line}: {reason}")]
    Parse {
        pod: String,
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("pod {pod}: change handler failed: {source}")]
    Handler {
        pod: String,
        #[source]
        source: DeliveryError,
    },

    #[error("pod {pod}: unknown connector kind '{kind}'")]
    UnknownKind { pod: String, kind: String },

    #[error("pod {pod}: connector '{kind}' requires '{option}'")]
    MissingOption {
        pod: String,
        kind: String,
        option: &'static str,
    },

    #[error("pod {pod}: connector {connector} failed to initialize: {message}")]
    Init {
        pod: String,
        connector: String,
        message: String,
    },
}

impl ConnectorError {
    pub fn pod(&self) -> &str {
        match self {
            Self::Read { pod, .. }
            | Self::Parse { pod, .. }
            | Self::Handler { pod, .. }
            | Self::UnknownKind { pod, .. }
            | Self::MissingOption { pod, .. }
            | Self::Init { pod, .. } => pod,
        }
    }
}

/// A pod-owned source of state snapshots
#[async_trait]
pub trait DataConnector: Send + Sync {
    /// Short connector kind, used in logs
    fn name(&self) -> &str;

    /// Set the connector up and register `handler` for its state changes
    async fn init(&self, pod: &str, handler: Arc<dyn ChangeHandler>) -> Result<(), ConnectorError>;
}

/// Build a connector from its configuration entry
pub fn build_connector(pod: &str, config: &ConnectorConfig) -> Result<Arc<dyn DataConnector>, ConnectorError> {
    debug!(%pod, kind = %config.kind, "build_connector: called");
    match config.kind.as_str() {
        "file" => {
            let path = config.path.clone().ok_or_else(|| ConnectorError::MissingOption {
                pod: pod.to_string(),
                kind: config.kind.clone(),
                option: "path",
            })?;
            Ok(Arc::new(FileConnector::new(path)))
        }
        other => Err(ConnectorError::UnknownKind {
            pod: pod.to_string(),
            kind: other.to_string(),
        }),
    }
}

/// Reads a CSV file of observations and reports it once at init
///
/// Expected format: a `time,<field>,...` header, then one row per
/// observation with a unix-seconds time and numeric values.
#[derive(Debug, Clone)]
pub struct FileConnector {
    path: PathBuf,
}

impl FileConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, pod: &str, content: &str) -> Result<State, ConnectorError> {
        let parse_error = |line: usize, reason: String| ConnectorError::Parse {
            pod: pod.to_string(),
            path: self.path.clone(),
            line,
            reason,
        };

        let mut lines = content
            .lines()
            .enumerate()
            .map(|(n, l)| (n + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (header_line, header) = lines.next().ok_or_else(|| parse_error(1, "missing header".to_string()))?;
        let mut columns = header.split(',').map(str::trim);
        if columns.next() != Some("time") {
            return Err(parse_error(header_line, "first column must be 'time'".to_string()));
        }
        let fields: Vec<String> = columns.map(str::to_string).collect();

        let mut observations = Vec::new();
        for (line, row) in lines {
            let cells: Vec<&str> = row.split(',').map(str::trim).collect();
            if cells.len() != fields.len() + 1 {
                return Err(parse_error(
                    line,
                    format!("expected {} columns, found {}", fields.len() + 1, cells.len()),
                ));
            }
            let time = cells[0]
                .parse::<i64>()
                .map_err(|e| parse_error(line, format!("invalid time '{}': {}", cells[0], e)))?;
            let values = cells[1..]
                .iter()
                .map(|c| {
                    c.parse::<f64>()
                        .map_err(|e| parse_error(line, format!("invalid value '{}': {}", c, e)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            observations.push(Observation { time, values });
        }

        Ok(State::new(self.path.display().to_string(), fields, observations))
    }
}

#[async_trait]
impl DataConnector for FileConnector {
    fn name(&self) -> &str {
        "file"
    }

    async fn init(&self, pod: &str, handler: Arc<dyn ChangeHandler>) -> Result<(), ConnectorError> {
        debug!(%pod, path = %self.path.display(), "FileConnector::init: called");
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConnectorError::Read {
                pod: pod.to_string(),
                path: self.path.clone(),
                source,
            })?;

        let state = self.parse(pod, &content)?;
        debug!(%pod, rows = state.observations.len(), "FileConnector::init: parsed");

        let metadata = HashMap::from([
            ("connector".to_string(), self.name().to_string()),
            ("path".to_string(), self.path.display().to_string()),
        ]);
        handler
            .on_change(state, metadata)
            .await
            .map_err(|source| ConnectorError::Handler {
                pod: pod.to_string(),
                source,
            })
    }
}
