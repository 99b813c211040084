use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("No pages configured")]
    NoPages,

    #[error("Fallback page '{0}' must stay enabled while downloading")]
    GatedFallbackPage(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("UI error: {0}")]
    Ui(String),
}
