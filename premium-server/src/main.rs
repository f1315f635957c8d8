//! InsureAI premium server
//!
//! JSON API over `premium-core`: accounts, estimates with history,
//! what-if scenarios and model insight.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Axum router ── JWT middleware               │
//! │      │                                       │
//! │      ├── PremiumEngine (Arc, read-only)      │
//! │      └── SQLite (users, predictions)         │
//! └──────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod models;
mod handlers;
mod middleware;
mod error;
mod extract;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use premium_core::PremiumEngine;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "premium_server=debug,premium_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    config.check()?;
    tracing::info!("InsureAI server starting ({})", config.environment);

    // Engine first: a broken artifact must stop startup before any request
    let engine = match &config.model_path {
        Some(path) => PremiumEngine::load(path)
            .with_context(|| format!("failed to load model artifact {}", path))?,
        None => PremiumEngine::reference().context("failed to load bundled reference model")?,
    };
    let info = engine.model_info();
    tracing::info!(
        "Model '{}' ({}) ready, layout v{} hash {:08x}",
        info.name,
        info.kind,
        info.layout.version,
        info.layout.hash
    );

    tracing::info!("Database: {}", config.database_url);
    let pool = db::create_pool(&config.database_url)
        .await
        .context("failed to open database")?;
    db::run_migrations(&pool).await.context("failed to apply schema")?;

    let state = AppState {
        pool,
        config: config.clone(),
        engine: Arc::new(engine),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub config: config::Config,
    pub engine: Arc<PremiumEngine>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/model", get(handlers::model::info));

    let user_routes = Router::new()
        .route(
            "/api/v1/predictions",
            get(handlers::predictions::list).post(handlers::predictions::create),
        )
        .route("/api/v1/scenarios", post(handlers::scenarios::run))
        .route("/api/v1/scenarios/presets", post(handlers::scenarios::presets))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth
        ));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
