//! HTTP/JSON implementation of the AI engine client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    AddDataRequest, AddDataResponse, AddInterpretationsRequest, AddInterpretationsResponse, EngineClient, EngineError,
    HealthProbe,
};
use crate::config::EngineConfig;

/// AI engine client speaking JSON over HTTP
///
/// `reqwest::Client` pools connections internally and is safe to share, so a
/// single instance serves every pod.
#[derive(Debug, Clone)]
pub struct HttpEngineClient {
    base_url: String,
    http: Client,
    health_timeout: Duration,
}

impl HttpEngineClient {
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        debug!(?config, "from_config: called");
        let http = Client::builder().build().map_err(EngineError::Network)?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            health_timeout: Duration::from_millis(config.health_timeout_ms),
        })
    }

    fn pod_url(&self, pod: &str, resource: &str) -> String {
        format!("{}/api/v0.1/pods/{}/{}", self.base_url, pod, resource)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    async fn post_json<Req, Resp>(&self, url: String, body: &Req, deadline: Duration) -> Result<Resp, EngineError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        debug!(%url, ?deadline, "post_json: called");
        let response = self
            .http
            .post(url)
            .timeout(deadline)
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::from_reqwest(e, deadline))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "post_json: API error");
            let message = response.text().await.unwrap_or_default();
            return Err(EngineError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::from_reqwest(e, deadline))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl EngineClient for HttpEngineClient {
    async fn add_interpretations(
        &self,
        request: AddInterpretationsRequest,
        deadline: Duration,
    ) -> Result<AddInterpretationsResponse, EngineError> {
        debug!(pod = %request.pod, count = request.indexed_interpretations.len(), "add_interpretations: called");
        let url = self.pod_url(&request.pod, "interpretations");
        self.post_json(url, &request, deadline).await
    }

    async fn add_data(&self, request: AddDataRequest, deadline: Duration) -> Result<AddDataResponse, EngineError> {
        debug!(pod = %request.pod, bytes = request.csv_data.len(), "add_data: called");
        let url = self.pod_url(&request.pod, "data");
        self.post_json(url, &request, deadline).await
    }
}

#[async_trait]
impl HealthProbe for HttpEngineClient {
    async fn check(&self) -> Result<(), EngineError> {
        debug!(url = %self.health_url(), "check: called");
        let response = self
            .http
            .get(self.health_url())
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| EngineError::from_reqwest(e, self.health_timeout))?;

        let status = response.status();
        if status.is_success() {
            debug!("check: healthy");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "check: unhealthy");
            Err(EngineError::Unhealthy(format!("status {}: {}", status.as_u16(), body.trim())))
        }
    }
}
