//! Readiness probe for the AI engine

use async_trait::async_trait;

use super::EngineError;

/// Answers whether the AI engine is reachable and ready
///
/// Called before every send. `Ok(())` means healthy.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> Result<(), EngineError>;
}
