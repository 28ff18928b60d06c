use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use engine_http::{EngineAvailability, HttpEngineClient, HttpEngineConfig};
use formelbank_config::{FormelbankConfig, LogConfigToml};
use formelbank_core::Workspace;
use formelbank_engine::FormulaEngine;
use formelbank_ui::{SystemClipboard, Ui};

#[tokio::main]
async fn main() -> Result<()> {
    let config = formelbank_config::load_from_env()?;
    init_file_logging(&config.log)?;

    let engine = Arc::new(build_engine_client(&config));
    if let Err(error) = engine.health_check().await {
        tracing::warn!(%error, "engine health check failed at startup");
    }

    let mut workspace =
        Workspace::new(engine).with_clipboard(Arc::new(SystemClipboard::new()));
    let mut ui = Ui::init()?;
    ui.run(&mut workspace)?;
    Ok(())
}

fn build_engine_client(config: &FormelbankConfig) -> HttpEngineClient {
    let availability = if config.engine.available {
        EngineAvailability::available()
    } else {
        EngineAvailability::unavailable("engine disabled in configuration")
    };
    HttpEngineClient::new(
        HttpEngineConfig {
            base_url: config.engine.base_url.clone(),
            request_timeout: config.engine.request_timeout(),
        },
        availability,
    )
}

fn init_file_logging(config: &LogConfigToml) -> Result<()> {
    let log_path = Path::new(config.path.as_str());
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.filter.as_str().into()),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();
    Ok(())
}
