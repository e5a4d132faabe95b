use anyhow::{Context, Result};
use essay_scorer::{config, server};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// `RUST_LOG` takes precedence over the configured level and may carry full
/// directives (`essay_scorer=debug`).
fn log_filter(rust_log: Option<&str>, configured_level: &str) -> Result<EnvFilter> {
    match rust_log {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid RUST_LOG directives: '{}'", directives)),
        None => {
            let level: LevelFilter = configured_level.parse().map_err(|_| {
                anyhow::anyhow!(
                    "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                    configured_level
                )
            })?;
            Ok(EnvFilter::default().add_directive(level.into()))
        }
    }
}

/// Installs the JSON subscriber and returns the effective filter for logging.
fn init_tracing(configured_level: &str) -> Result<String> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = log_filter(rust_log.as_deref(), configured_level)?;

    let description = filter.to_string();
    tracing_subscriber::fmt().with_env_filter(filter).json().init();
    Ok(description)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()
        .await
        .context("Failed to load configuration")?;

    let filter = init_tracing(&config.server.logs.level)?;

    info!(
        backend = config.model.backend.as_str(),
        model = %config.model.name,
        max_input_chars = ?config.model.max_input_chars,
        log_filter = %filter,
        "Starting essay scorer"
    );

    server::run(config).await?;

    Ok(())
}
