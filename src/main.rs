//! Semantic Auth Demo Client
//!
//! Web front for a semantic-similarity authentication service. Users register
//! and log in through it, and browse a chart of recent login attempts.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SEMANTIC AUTH CLIENT                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌──────────────────────┐  │
//! │  │  Pages    │  │  Report      │  │  Collaborator        │  │
//! │  │  (Axum)   │─►│  Pipeline    │  │  Client (reqwest)    │  │
//! │  │           │  │  + SVG chart │  │                      │  │
//! │  └─────┬─────┘  └──────────────┘  └──────────┬───────────┘  │
//! │        └─────────────────────────────────────┘              │
//! │                              ▼                              │
//! │                   ┌──────────────────────┐                  │
//! │                   │ similarity service   │                  │
//! │                   │ /register /login     │                  │
//! │                   │ /report  /health     │                  │
//! │                   └──────────────────────┘                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod api;
mod config;
mod error;
mod handlers;
mod models;
mod render;
mod report;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::CollaboratorClient;
use config::{Config, LogFormat};
use session::ReportCache;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    init_tracing(config.log_format);

    tracing::info!("Semantic Auth client starting...");
    tracing::info!("Collaborator: {}", config.api_url);

    let client = CollaboratorClient::new(config.client_config())
        .context("Failed to build HTTP client")?;

    // Build application state
    let state = AppState {
        config: config.clone(),
        client,
        reports: Arc::new(ReportCache::new()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "semantic_auth_client=debug,tower_http=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub client: CollaboratorClient,
    pub reports: Arc<ReportCache>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Pages
    let page_routes = Router::new()
        .route("/", get(handlers::auth::login_form))
        .route(
            "/login",
            get(handlers::auth::login_form).post(handlers::auth::login),
        )
        .route(
            "/register",
            get(handlers::auth::register_form).post(handlers::auth::register),
        )
        .route("/report", get(handlers::reports::page))
        .route("/report/view", get(handlers::reports::redraw));

    // JSON
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/health/upstream", get(handlers::health::upstream))
        .route("/api/report", get(handlers::reports::dataset));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if !origins.is_empty() {
        return layer.allow_origin(AllowOrigin::list(origins));
    }

    if config.is_production() {
        tracing::warn!("No CORS_ALLOWED_ORIGINS set in production; cross-origin requests are refused");
        layer
    } else {
        layer.allow_origin(Any)
    }
}
