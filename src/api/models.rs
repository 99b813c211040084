use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::Progress;

/// Response from the running-status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunningStatus {
    pub running: bool,
    #[serde(default)]
    pub progress: Option<Progress>,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Upper bound for the start command. Status requests have none; the
    /// shell's watchdog decides when the backend is gone.
    pub start_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:7505".to_string(),
            user_agent: format!("rmd-shell/{}", env!("CARGO_PKG_VERSION")),
            start_timeout: Duration::from_secs(30),
        }
    }
}
