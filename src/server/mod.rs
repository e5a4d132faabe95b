pub mod handlers;
pub mod types;

pub use handlers::AppState;

use crate::{Error, Result, classifier::create_classifier, config::Config};
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/score", post(handlers::score))
        .route("/health", get(handlers::health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Initialize classifier once; it is read-only for the process lifetime
    let model_config = config.model.clone();
    let classifier = tokio::task::spawn_blocking(move || create_classifier(&model_config))
        .await
        .map_err(|e| Error::internal(format!("Classifier loading task failed: {}", e)))??;
    let app = router(AppState::new(classifier));

    let port = match std::env::var("PORT") {
        Ok(port) => port
            .parse()
            .map_err(|e| Error::config(format!("Invalid PORT '{}': {}", port, e)))?,
        Err(_) => config.server.port,
    };

    let addr = SocketAddr::new(config.server.host.parse()?, port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Listening on {} ({} backend, input limit {})",
        listener.local_addr()?,
        config.model.backend.as_str(),
        config
            .model
            .max_input_chars
            .map_or_else(|| "none".to_string(), |max| format!("{} chars", max))
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
