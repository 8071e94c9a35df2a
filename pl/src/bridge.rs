//! DataChangeBridge - forwards connector state changes to the AI engine

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Pod, State};
use crate::engine::{DeliveryError, EngineSender};

/// Callback connectors invoke with each state snapshot they produce
///
/// May be called concurrently by several connectors.
#[async_trait]
pub trait ChangeHandler: Send + Sync {
    async fn on_change(&self, state: State, metadata: HashMap<String, String>) -> Result<(), DeliveryError>;
}

/// Per-pod handler that sends every change straight to the engine
///
/// Holds no state between calls: one invocation is one delivery attempt.
pub struct DataChangeBridge {
    pod: Arc<Pod>,
    sender: Arc<EngineSender>,
}

impl DataChangeBridge {
    pub fn new(pod: Arc<Pod>, sender: Arc<EngineSender>) -> Self {
        Self { pod, sender }
    }
}

#[async_trait]
impl ChangeHandler for DataChangeBridge {
    async fn on_change(&self, state: State, metadata: HashMap<String, String>) -> Result<(), DeliveryError> {
        debug!(pod = %self.pod.name(), origin = %state.origin, ?metadata, "on_change: called");
        self.sender.send_data(&self.pod, &state).await
    }
}
