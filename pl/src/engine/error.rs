//! Engine error types

use std::time::Duration;
use thiserror::Error;

/// Transport-level failures talking to the AI engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("AI engine is not healthy: {0}")]
    Unhealthy(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Map a reqwest failure, keeping timeouts distinct from other network errors
    pub fn from_reqwest(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            EngineError::Timeout(deadline)
        } else {
            EngineError::Network(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, EngineError::Timeout(_))
    }
}

/// Which outbound operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Interpretations,
    Data,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interpretations => write!(f, "interpretations"),
            Self::Data => write!(f, "data"),
        }
    }
}

/// Outcome of a failed delivery to the AI engine
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Probe failed, nothing was sent
    #[error("AI engine health check failed: {0}")]
    HealthCheck(#[source] EngineError),

    /// The call itself did not complete
    #[error("failed to post new {operation} to pod {pod}: {source}")]
    Transport {
        pod: String,
        operation: Operation,
        #[source]
        source: EngineError,
    },

    /// The call completed but the engine reported failure
    #[error("failed to post new {operation} to pod {pod}: {result}")]
    Application {
        pod: String,
        operation: Operation,
        result: String,
    },
}

impl DeliveryError {
    pub fn is_timeout(&self) -> bool {
        match self {
            DeliveryError::Transport { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Pod the failed delivery was for, if the failure got that far
    pub fn pod(&self) -> Option<&str> {
        match self {
            DeliveryError::HealthCheck(_) => None,
            DeliveryError::Transport { pod, .. } | DeliveryError::Application { pod, .. } => Some(pod),
        }
    }
}
