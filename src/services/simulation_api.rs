use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::simulation::{SeriesResponse, SimulationRequest, SimulationSummary};
use crate::services::service_config::ServiceConfig;

pub const SIMULATE_PATH: &str = "simulate";
pub const SERIES_PATH: &str = "series";

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("could not reach {url}: {reason}")]
    Connection { url: String, reason: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("{url} returned invalid json: {reason}")]
    MalformedJson { url: String, reason: String },
    #[error("unexpected response from {url}: {reason}")]
    ResponseShape { url: String, reason: String },
}

/// The remote banner simulation engine.
#[async_trait]
pub trait SimulationService: Send + Sync {
    /// Base URL used in user-facing output.
    fn describe(&self) -> String;

    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationSummary, ServiceError>;

    async fn series(&self, request: &SimulationRequest) -> Result<SeriesResponse, ServiceError>;
}

pub struct SimulationApiClient {
    config: ServiceConfig,
    client: Client,
}

impl SimulationApiClient {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;
        Ok(Self { config, client })
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &SimulationRequest,
    ) -> Result<T, ServiceError> {
        let url = self.config.endpoint(path);
        debug!(%url, ?request, "posting simulation request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "simulation service responded");
        if !status.is_success() {
            return Err(ServiceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let payload: Value =
            serde_json::from_slice(&body).map_err(|e| ServiceError::MalformedJson {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        serde_json::from_value(payload).map_err(|e| ServiceError::ResponseShape {
            url,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl SimulationService for SimulationApiClient {
    fn describe(&self) -> String {
        self.config.base_url.trim().trim_end_matches('/').to_string()
    }

    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationSummary, ServiceError> {
        let summary: SimulationSummary = self.post_json(SIMULATE_PATH, request).await?;
        summary
            .validate()
            .map_err(|reason| ServiceError::ResponseShape {
                url: self.config.endpoint(SIMULATE_PATH),
                reason,
            })?;
        Ok(summary)
    }

    async fn series(&self, request: &SimulationRequest) -> Result<SeriesResponse, ServiceError> {
        let series: SeriesResponse = self.post_json(SERIES_PATH, request).await?;
        series
            .validate()
            .map_err(|reason| ServiceError::ResponseShape {
                url: self.config.endpoint(SERIES_PATH),
                reason,
            })?;
        Ok(series)
    }
}

fn transport_error(url: &str, error: reqwest::Error) -> ServiceError {
    if error.is_timeout() {
        ServiceError::Timeout {
            url: url.to_string(),
        }
    } else {
        ServiceError::Connection {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}
