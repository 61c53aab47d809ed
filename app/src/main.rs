use std::sync::Arc;

use nlq_app::logging::{init_logging, LogTarget};
use nlq_core::api::GraphQueryApi;
use nlq_core::config::AppConfig;
use nlq_tui::{TuiError, TuiSettings};

fn run_app(
    config: &AppConfig,
    run_tui: impl FnOnce(Arc<dyn GraphQueryApi>, TuiSettings) -> Result<(), TuiError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = nlq_app::http_api(config)?;
    let settings = TuiSettings {
        backend_url: config.backend_url.clone(),
        schema_policy: config.schema_failure_policy,
    };
    run_tui(Arc::new(api), settings)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_default()?;
    init_logging(&config.log.level, &LogTarget::File(config.log_file_path()?))?;
    tracing::info!(backend_url = %config.backend_url, "configuration loaded");
    run_app(&config, nlq_tui::run)
}
