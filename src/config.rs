use std::time::Duration;

use crate::{
    api::ApiConfig,
    application::ShellTiming,
    domain::AppError,
    utils::Location,
};

pub const DEFAULT_LOCATION: &str = "http://127.0.0.1:7505/";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub location: Location,
    pub timing: ShellTiming,
}

impl AppConfig {
    /// Location from the first command-line argument or `RMD_URL`; timings
    /// from `RMD_POLL_INTERVAL_MS`, `RMD_WATCHDOG_MS` and `RMD_NOTICE_TTL_MS`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_sources(std::env::args().nth(1), |key| std::env::var(key).ok())
    }

    pub fn from_sources(
        arg: Option<String>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let location = arg
            .or_else(|| var("RMD_URL"))
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
        let location = Location::parse(&location)?;

        let defaults = ShellTiming::default();
        let timing = ShellTiming {
            poll_interval: millis(&var, "RMD_POLL_INTERVAL_MS", defaults.poll_interval)?,
            watchdog: millis(&var, "RMD_WATCHDOG_MS", defaults.watchdog)?,
            notice_ttl: millis(&var, "RMD_NOTICE_TTL_MS", defaults.notice_ttl)?,
        };

        Ok(Self { location, timing })
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.location.backend_base().to_string(),
            ..ApiConfig::default()
        }
    }
}

fn millis(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, AppError> {
    let Some(raw) = var(key) else {
        return Ok(default);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(AppError::Config(format!("{} must be greater than zero", key))),
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(e) => Err(AppError::Config(format!("{}={}: {}", key, raw, e))),
    }
}
