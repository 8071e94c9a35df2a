//! EngineClient trait definition

use std::time::Duration;

use async_trait::async_trait;

use super::{AddDataRequest, AddDataResponse, AddInterpretationsRequest, AddInterpretationsResponse, EngineError};

/// Stateless AI engine client - each call is independent
///
/// One client is built at startup and shared read-only by every sender,
/// so implementations must tolerate concurrent calls. Each method takes the
/// per-call deadline the transport should apply.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Deliver a batch of interpretations for one pod
    async fn add_interpretations(
        &self,
        request: AddInterpretationsRequest,
        deadline: Duration,
    ) -> Result<AddInterpretationsResponse, EngineError>;

    /// Deliver a CSV block of observations for one pod
    async fn add_data(&self, request: AddDataRequest, deadline: Duration) -> Result<AddDataResponse, EngineError>;
}
