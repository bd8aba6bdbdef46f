//! API server wiring: config, state, router, startup and shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::sheet::{GridSource, SheetFetcher};

use super::handlers;

/// API server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Shared application state: the workbook source behind the endpoints.
pub struct AppState {
    pub source: Arc<dyn GridSource>,
}

/// Build the router over any workbook source. Kept separate from server
/// startup so tests can drive it with a stub source.
pub fn router(state: Arc<AppState>) -> Router {
    // The front-end chart consumer is a static page on another origin;
    // this API is read-only, so GET from anywhere is the whole policy.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/data", get(handlers::data))
        .route("/assets", get(handlers::assets))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ivdar_sheet_api=info,tower_http=info".into()),
        )
        .init();

    // Default wiring re-fetches on every request. Wrap the fetcher in
    // `CachedSource::new(SheetFetcher::new(), ttl)` to serve TTL-bound
    // snapshots instead.
    let state = Arc::new(AppState {
        source: Arc::new(SheetFetcher::new()),
    });

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("IVDAR Sheet API starting on http://{}", addr);
    info!("   Endpoints: / (info), /data (raw rows), /assets (parsed)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("IVDAR Sheet API shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
