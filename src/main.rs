mod api;
mod app;
mod application;
mod config;
mod domain;
mod ui;
mod utils;

use tracing_subscriber::EnvFilter;

use crate::{
    api::ApiClient,
    app::RmdApp,
    application::Shell,
    config::AppConfig,
    domain::{default_pages, AppError},
    utils::Location,
};

fn main() -> Result<(), AppError> {
    init_tracing();

    let (location, api_client, shell) = AppConfig::from_env()
        .and_then(mount)
        .inspect_err(|e| tracing::error!(error = %e, "failed to start RMD"))?;

    tracing::info!(%location, "starting RMD");

    iced::application(
        move || RmdApp::new(location.clone(), api_client.clone(), shell.clone()).boot(),
        app::update,
        app::view,
    )
    .title(app::title)
    .window_size((960.0, 640.0))
    .run()
    .map_err(|e| AppError::Ui(e.to_string()))
}

/// Everything the window needs, validated before it opens.
fn mount(config: AppConfig) -> Result<(Location, ApiClient, Shell), AppError> {
    let api_client =
        ApiClient::new(config.api_config()).map_err(|e| AppError::Api(e.to_string()))?;
    let shell = Shell::new(default_pages(), config.location.page_hint(), config.timing)?;

    Ok((config.location, api_client, shell))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
