pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{ApiConfig, RunningStatus};
