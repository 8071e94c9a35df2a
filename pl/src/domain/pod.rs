//! Pod - an independently configured processing unit

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::InterpretationStore;
use super::interpretation::from_unix;
use crate::bridge::ChangeHandler;
use crate::config::PodConfig;
use crate::connector::{ConnectorError, DataConnector, build_connector};

/// A pod owns its interpretation store and its data connectors
pub struct Pod {
    name: String,
    interpretations: InterpretationStore,
    interpretations_path: PathBuf,
    connectors: Vec<Arc<dyn DataConnector>>,
}

impl std::fmt::Debug for Pod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pod")
            .field("name", &self.name)
            .field("interpretations", &self.interpretations.len())
            .field("interpretations_path", &self.interpretations_path)
            .field("connectors", &self.connectors.iter().map(|c| c.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl Pod {
    /// Create a pod with an empty store covering `[epoch, epoch + period]`
    pub fn new(name: impl Into<String>, epoch: DateTime<Utc>, period: Duration) -> Self {
        let name = name.into();
        let interpretations_path = default_interpretations_path(&name);
        Self {
            name,
            interpretations: InterpretationStore::new(epoch, period),
            interpretations_path,
            connectors: Vec::new(),
        }
    }

    /// Build a pod and its connectors from configuration
    pub fn from_config(config: &PodConfig) -> Result<Self, ConnectorError> {
        debug!(pod = %config.name, connectors = config.connectors.len(), "from_config: called");
        let invalid = |message: String| ConnectorError::Init {
            pod: config.name.clone(),
            connector: "pod".to_string(),
            message,
        };
        let epoch = from_unix(config.epoch).map_err(|e| invalid(e.to_string()))?;
        let period = i64::try_from(config.period_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| invalid(format!("period of {}s is out of range", config.period_secs)))?;

        let mut pod = Pod::new(config.name.clone(), epoch, period);
        if let Some(path) = &config.interpretations_path {
            pod.interpretations_path = path.clone();
        }
        for connector in &config.connectors {
            pod.connectors.push(build_connector(&config.name, connector)?);
        }
        Ok(pod)
    }

    pub fn with_connector(mut self, connector: Arc<dyn DataConnector>) -> Self {
        self.connectors.push(connector);
        self
    }

    pub fn with_interpretations_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.interpretations_path = path.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interpretations(&self) -> &InterpretationStore {
        &self.interpretations
    }

    pub fn interpretations_mut(&mut self) -> &mut InterpretationStore {
        &mut self.interpretations
    }

    pub fn interpretations_path(&self) -> &Path {
        &self.interpretations_path
    }

    pub fn connectors(&self) -> &[Arc<dyn DataConnector>] {
        &self.connectors
    }

    /// Initialize every connector in order, handing each the change handler
    ///
    /// Stops at the first connector that fails.
    pub async fn init_data_connectors(&self, handler: Arc<dyn ChangeHandler>) -> Result<(), ConnectorError> {
        debug!(pod = %self.name, count = self.connectors.len(), "init_data_connectors: called");
        for connector in &self.connectors {
            connector.init(&self.name, handler.clone()).await?;
            debug!(pod = %self.name, connector = %connector.name(), "init_data_connectors: connector ready");
        }
        info!(pod = %self.name, count = self.connectors.len(), "Data connectors initialized");
        Ok(())
    }
}

/// `.pods/<name>/interpretations.json`
pub fn default_interpretations_path(name: &str) -> PathBuf {
    PathBuf::from(".pods").join(name).join("interpretations.json")
}
