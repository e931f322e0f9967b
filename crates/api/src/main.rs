//! Threadline API server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use threadline_common::config::AppConfig;
use threadline_common::error::AppError;
use threadline_engine::NotificationPipeline;
use threadline_notifier::WebhookDispatcher;

use threadline_api::routes::create_router;
use threadline_api::state::AppState;

/// Upper bound for incoming event bodies.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "threadline_api=info,threadline_engine=debug,threadline_notifier=debug,tower_http=info",
        )
    });
    if config.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Starting Threadline API server...");

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .map_err(|e| AppError::Config(format!("LISTEN_ADDR '{}': {}", config.listen_addr, e)))?;

    // Build the notification pipeline
    let dispatcher = WebhookDispatcher::new(Duration::from_secs(config.webhook_timeout_secs));
    let pipeline = NotificationPipeline::new(Arc::new(dispatcher));

    if config.notifications.default_webhook_url.is_none() {
        tracing::info!("No DEFAULT_WEBHOOK_URL set, only project webhooks will be used");
    }

    // Build application state
    let state = AppState::new(pipeline, config.notifications.clone());

    // Build router
    let app = create_router(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    tracing::info!("Threadline API server stopped.");
    Ok(())
}
