use reqwest::Client;
use thiserror::Error;

use super::models::{ApiConfig, RunningStatus};

const RUNNING_PATH: &str = "api/running";
const START_PATH: &str = "api/download/start";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Backend returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Client for the download backend. Cheap to clone; clones share one
/// connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { config, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Query whether the backend is currently downloading.
    pub async fn get_running_status(&self) -> Result<RunningStatus> {
        let response = self
            .http
            .get(self.endpoint(RUNNING_PATH))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::ApiError(format!("Status request failed: {}", e)))?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Ask the backend to begin downloading.
    /// Returns `false` when the backend refuses, e.g. because it is already running.
    pub async fn start_download(&self) -> Result<bool> {
        let response = self
            .http
            .post(self.endpoint(START_PATH))
            .timeout(self.config.start_timeout)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::ApiError(format!("Start request failed: {}", e)))?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }
}
