use promotion_predictor::{
    api::{build_router, AppState},
    config::Config,
    ml::{ArtifactStore, InferencePipeline},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; a failure is reported once logging is up
    let (config, config_error) = Config::load_or_default(&Config::default_path());

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "promotion_predictor={},tower_http=info",
            config.observability.log_level
        )
        .into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if let Some(e) = config_error {
        tracing::warn!("Failed to load configuration, using defaults: {}", e);
    }

    tracing::info!("Starting promotion predictor v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Artifact directory: {}", config.artifacts.dir.display());

    // Artifacts are required; nothing can be served without them
    let store = ArtifactStore::new(config.artifacts.paths());
    let bundle = store.load().map_err(|e| {
        tracing::error!("Failed to load prediction artifacts: {}", e);
        e
    })?;
    let pipeline = Arc::new(InferencePipeline::new(bundle));
    tracing::info!("✅ Inference pipeline ready");

    let app = build_router(AppState::new(pipeline));

    let addr = format!("{}:{}", config.server.host, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("🛑 Shutdown signal received");
}
