//! Concurrent connector bootstrap across all pods
//!
//! One task per pod, joined on all of them. A failing pod never cancels its
//! siblings: every pod gets its chance to initialize, and the first error
//! by completion order is reported once they have all finished.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::bridge::DataChangeBridge;
use crate::connector::ConnectorError;
use crate::domain::Pod;
use crate::engine::EngineSender;

/// Errors from bootstrapping pod connectors
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    #[error("connector init task panicked: {reason}")]
    Panicked { reason: String },
}

/// Initialize every pod's data connectors concurrently
pub async fn init_data_connectors(pods: &[Arc<Pod>], sender: Arc<EngineSender>) -> Result<(), BootstrapError> {
    debug!(pod_count = pods.len(), "init_data_connectors: called");
    let mut tasks = JoinSet::new();
    for pod in pods {
        let pod = pod.clone();
        let sender = sender.clone();
        tasks.spawn(async move { init_pod_data_connectors(pod, sender).await });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let result = match joined {
            Ok(result) => result.map_err(BootstrapError::from),
            Err(e) => Err(BootstrapError::Panicked { reason: e.to_string() }),
        };
        if let Err(e) = result {
            error!(error = %e, "Pod connector bootstrap failed");
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => {
            info!(pod_count = pods.len(), "All pod connectors initialized");
            Ok(())
        }
    }
}

/// Initialize one pod's connectors with a bridge to the engine as the change handler
pub async fn init_pod_data_connectors(pod: Arc<Pod>, sender: Arc<EngineSender>) -> Result<(), ConnectorError> {
    debug!(pod = %pod.name(), "init_pod_data_connectors: called");
    let bridge = Arc::new(DataChangeBridge::new(pod.clone(), sender));
    pod.init_data_connectors(bridge).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ChangeHandler;
    use crate::connector::DataConnector;
    use crate::engine::client::mock::{MockEngineClient, MockHealthProbe};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration as StdDuration;

    /// Connector that sleeps, then succeeds or fails, counting completions
    struct StubConnector {
        delay: StdDuration,
        fail: bool,
        completed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DataConnector for StubConnector {
        fn name(&self) -> &str {
            "stub"
        }

        async fn init(&self, pod: &str, _handler: Arc<dyn ChangeHandler>) -> Result<(), ConnectorError> {
            tokio::time::sleep(self.delay).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ConnectorError::Init {
                    pod: pod.to_string(),
                    connector: "stub".to_string(),
                    message: "bad credentials".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn pod(name: &str, delay_ms: u64, fail: bool, completed: &Arc<AtomicUsize>) -> Arc<Pod> {
        let connector = StubConnector {
            delay: StdDuration::from_millis(delay_ms),
            fail,
            completed: completed.clone(),
        };
        Arc::new(
            Pod::new(name, DateTime::from_timestamp(0, 0).unwrap(), Duration::days(1)).with_connector(Arc::new(connector)),
        )
    }

    fn sender() -> Arc<EngineSender> {
        Arc::new(EngineSender::new(
            Arc::new(MockEngineClient::new()),
            Arc::new(MockHealthProbe::healthy()),
        ))
    }

    #[tokio::test]
    async fn test_all_succeed() {
        let completed = Arc::new(AtomicUsize::new(0));
        let pods = vec![pod("a", 10, false, &completed), pod("b", 5, false, &completed)];

        init_data_connectors(&pods, sender()).await.unwrap();
        assert_eq!(completed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_does_not_cancel_siblings() {
        let completed = Arc::new(AtomicUsize::new(0));
        // B fails first; A and C finish later and must still run
        let pods = vec![
            pod("a", 100, false, &completed),
            pod("b", 1, true, &completed),
            pod("c", 150, false, &completed),
        ];

        let err = init_data_connectors(&pods, sender()).await.unwrap_err();

        assert_eq!(completed.load(Ordering::SeqCst), 3);
        match err {
            BootstrapError::Connector(e) => assert_eq!(e.pod(), "b"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_first_error_by_completion_order() {
        let completed = Arc::new(AtomicUsize::new(0));
        let pods = vec![pod("slow", 200, true, &completed), pod("fast", 10, true, &completed)];

        let err = init_data_connectors(&pods, sender()).await.unwrap_err();

        assert!(err.to_string().contains("pod fast"), "got: {err}");
        assert_eq!(completed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_pods() {
        assert!(init_data_connectors(&[], sender()).await.is_ok());
    }

    #[tokio::test]
    async fn test_runs_concurrently() {
        let completed = Arc::new(AtomicUsize::new(0));
        let pods: Vec<_> = (0..5).map(|i| pod(&format!("p{i}"), 200, false, &completed)).collect();

        let started = std::time::Instant::now();
        init_data_connectors(&pods, sender()).await.unwrap();

        assert_eq!(completed.load(Ordering::SeqCst), 5);
        assert!(started.elapsed() < StdDuration::from_millis(900));
    }
}
