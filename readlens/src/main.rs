mod api;
mod config;
mod detection;
mod engine;
mod error;
mod imaging;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::engine::EngineRegistry;

#[derive(Parser)]
#[command(name = "readlens")]
#[command(about = "HTTP service that extracts text from base64-encoded images")]
struct Args {
    /// Language sets to warm in the engine cache at startup,
    /// e.g. --preload-languages en,de
    #[arg(long, value_delimiter = ',')]
    preload_languages: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "readlens=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let engines = EngineRegistry::new(config.ocr.clone());

    let preload = if args.preload_languages.is_empty() {
        config.ocr.preload_languages.clone()
    } else {
        args.preload_languages
    };
    if !preload.is_empty() {
        tracing::info!(languages = ?preload, "preloading OCR engine");
        if let Err(e) = engines.get_or_init(&preload).await {
            tracing::warn!("failed to preload OCR engine: {} - it will be retried on first request", e);
        }
    }

    let state = AppState::new(config.clone(), engines);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("readlens starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  API docs:     http://{}/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
