//! EngineSender - health-gated, deadline-bounded delivery to the AI engine
//!
//! Every send is one unit: empty payloads are a no-op, otherwise the engine
//! is probed and then exactly one RPC is issued. Nothing is retried here;
//! retry policy belongs to the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::{
    AddDataRequest, AddInterpretationsRequest, DeliveryError, EngineClient, EngineError, HealthProbe, Operation,
};
use crate::config::EngineConfig;
use crate::domain::{IndexedInterpretations, Pod, State};

/// Default deadline for a single engine call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(1);

/// Shared handle for pushing interpretations and data to the AI engine
pub struct EngineSender {
    client: Arc<dyn EngineClient>,
    probe: Arc<dyn HealthProbe>,
    call_timeout: Duration,
}

impl EngineSender {
    pub fn new(client: Arc<dyn EngineClient>, probe: Arc<dyn HealthProbe>) -> Self {
        Self {
            client,
            probe,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn from_config(client: Arc<dyn EngineClient>, probe: Arc<dyn HealthProbe>, config: &EngineConfig) -> Self {
        Self::new(client, probe).with_call_timeout(Duration::from_millis(config.call_timeout_ms))
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Probe the engine on its own
    pub async fn check_health(&self) -> Result<(), DeliveryError> {
        self.probe.check().await.map_err(DeliveryError::HealthCheck)
    }

    /// Send a pod's indexed interpretations as a single batch
    pub async fn send_interpretations(&self, pod: &Pod, indexed: &IndexedInterpretations) -> Result<(), DeliveryError> {
        debug!(pod = %pod.name(), count = indexed.len(), "send_interpretations: called");
        if indexed.is_empty() {
            debug!("send_interpretations: nothing to send");
            return Ok(());
        }

        self.check_health().await?;

        let request = AddInterpretationsRequest {
            pod: pod.name().to_string(),
            indexed_interpretations: indexed.clone(),
        };

        let start = Instant::now();
        let response = self
            .bounded(self.client.add_interpretations(request, self.call_timeout))
            .await
            .map_err(|source| DeliveryError::Transport {
                pod: pod.name().to_string(),
                operation: Operation::Interpretations,
                source,
            })?;

        if response.error {
            debug!(result = %response.result, "send_interpretations: engine reported error");
            return Err(DeliveryError::Application {
                pod: pod.name().to_string(),
                operation: Operation::Interpretations,
                result: response.result,
            });
        }

        info!(
            pod = %pod.name(),
            count = indexed.len(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Sent interpretations to AI engine"
        );
        Ok(())
    }

    /// Send one state snapshot for a pod
    pub async fn send_data(&self, pod: &Pod, state: &State) -> Result<(), DeliveryError> {
        debug!(pod = %pod.name(), origin = %state.origin, rows = state.observations.len(), "send_data: called");
        if state.is_empty() {
            debug!("send_data: no observations");
            return Ok(());
        }

        self.check_health().await?;

        let request = AddDataRequest {
            pod: pod.name().to_string(),
            csv_data: state.to_csv(),
        };

        let start = Instant::now();
        let response = self
            .bounded(self.client.add_data(request, self.call_timeout))
            .await
            .map_err(|source| DeliveryError::Transport {
                pod: pod.name().to_string(),
                operation: Operation::Data,
                source,
            })?;

        if response.error {
            debug!(result = %response.result, "send_data: engine reported error");
            return Err(DeliveryError::Application {
                pod: pod.name().to_string(),
                operation: Operation::Data,
                result: response.result,
            });
        }

        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "send_data: sent");
        Ok(())
    }

    /// Enforce the call deadline regardless of whether the transport honours it
    async fn bounded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, EngineError>>,
    ) -> Result<T, EngineError> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                debug!(timeout = ?self.call_timeout, "bounded: deadline exceeded");
                Err(EngineError::Timeout(self.call_timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Interpretation, Observation};
    use crate::engine::client::mock::{MockEngineClient, MockHealthProbe};
    use crate::engine::{AddDataResponse, AddInterpretationsResponse};
    use chrono::{DateTime, Duration as ChronoDuration};

    fn pod() -> Pod {
        Pod::new("trader", DateTime::from_timestamp(0, 0).unwrap(), ChronoDuration::days(1))
    }

    fn batch(n: i64) -> IndexedInterpretations {
        let interpretations = (0..n)
            .map(|i| {
                Interpretation::new(
                    DateTime::from_timestamp(i * 10, 0).unwrap(),
                    DateTime::from_timestamp(i * 10 + 5, 0).unwrap(),
                    format!("i{i}"),
                )
                .unwrap()
            })
            .collect();
        IndexedInterpretations::new(interpretations)
    }

    fn state(rows: usize) -> State {
        State::new(
            "test",
            vec!["v".to_string()],
            (0..rows)
                .map(|i| Observation {
                    time: i as i64,
                    values: vec![i as f64],
                })
                .collect(),
        )
    }

    fn sender(client: &Arc<MockEngineClient>, probe: &Arc<MockHealthProbe>) -> EngineSender {
        EngineSender::new(client.clone(), probe.clone())
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let client = Arc::new(MockEngineClient::new());
        let probe = Arc::new(MockHealthProbe::healthy());

        sender(&client, &probe)
            .send_interpretations(&pod(), &IndexedInterpretations::default())
            .await
            .unwrap();

        assert_eq!(probe.calls(), 0);
        assert_eq!(client.interpretation_calls(), 0);
    }

    #[tokio::test]
    async fn test_unhealthy_engine_blocks_rpc() {
        let client = Arc::new(MockEngineClient::new());
        let probe = Arc::new(MockHealthProbe::unhealthy());

        let err = sender(&client, &probe)
            .send_interpretations(&pod(), &batch(2))
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::HealthCheck(_)));
        assert_eq!(probe.calls(), 1);
        assert_eq!(client.interpretation_calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_send_carries_pod_and_batch() {
        let client = Arc::new(MockEngineClient::new());
        let probe = Arc::new(MockHealthProbe::healthy());

        sender(&client, &probe)
            .send_interpretations(&pod(), &batch(3))
            .await
            .unwrap();

        assert_eq!(client.interpretation_calls(), 1);
        let requests = client.requests();
        assert_eq!(requests[0].pod, "trader");
        assert_eq!(requests[0].indexed_interpretations, batch(3));
    }

    #[tokio::test]
    async fn test_application_error_wrapped_with_pod() {
        let client = Arc::new(
            MockEngineClient::new().with_interpretations_response(AddInterpretationsResponse::failed("X marks it")),
        );
        let probe = Arc::new(MockHealthProbe::healthy());

        let err = sender(&client, &probe)
            .send_interpretations(&pod(), &batch(1))
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::Application { .. }));
        let msg = err.to_string();
        assert!(msg.contains("trader"));
        assert!(msg.contains("X marks it"));
        assert_eq!(client.interpretation_calls(), 1);
    }

    #[tokio::test]
    async fn test_slow_engine_times_out() {
        let client = Arc::new(MockEngineClient::new().with_delay(Duration::from_secs(5)));
        let probe = Arc::new(MockHealthProbe::healthy());
        let sender = sender(&client, &probe).with_call_timeout(Duration::from_millis(100));

        let started = Instant::now();
        let err = sender.send_interpretations(&pod(), &batch(1)).await.unwrap_err();

        assert!(err.is_timeout(), "expected timeout, got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(client.interpretation_calls(), 1);
    }

    #[tokio::test]
    async fn test_default_timeout_is_one_second() {
        let client = Arc::new(MockEngineClient::new());
        let probe = Arc::new(MockHealthProbe::healthy());
        assert_eq!(sender(&client, &probe).call_timeout(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_send_data_empty_state_is_noop() {
        let client = Arc::new(MockEngineClient::new());
        let probe = Arc::new(MockHealthProbe::healthy());

        sender(&client, &probe).send_data(&pod(), &state(0)).await.unwrap();

        assert_eq!(probe.calls(), 0);
        assert_eq!(client.data_calls(), 0);
    }

    #[tokio::test]
    async fn test_send_data_posts_csv() {
        let client = Arc::new(MockEngineClient::new());
        let probe = Arc::new(MockHealthProbe::healthy());

        sender(&client, &probe).send_data(&pod(), &state(2)).await.unwrap();

        let requests = client.data_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].pod, "trader");
        assert_eq!(requests[0].csv_data, "time,v\n0,0\n1,1\n");
    }

    #[tokio::test]
    async fn test_send_data_application_error() {
        let client = Arc::new(MockEngineClient::new().with_data_response(AddDataResponse::failed("schema mismatch")));
        let probe = Arc::new(MockHealthProbe::healthy());

        let err = sender(&client, &probe).send_data(&pod(), &state(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to post new data to pod trader: schema mismatch");
    }
}
