//! HTTP server bootstrap.
//!
//! This module wires together:
//! - configuration
//! - database connection pool and migrations
//! - core services (submission lifecycle, stores, token validator)
//! - the Axum router

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api;
use crate::api::handlers::health;
use crate::auth::{auth_middleware, AuthMiddlewareState, TokenValidator};
use crate::infra::{
    ActorDirectory, NotificationStore, PgActorDirectory, PgNotificationStore, PgSubmissionStore,
    PgTokenStore, PgZoneStore, TokenStore, ZoneStore,
};
use crate::lifecycle::SubmissionLifecycle;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Server listen address.
    pub listen_addr: SocketAddr,
    /// Maximum database connections.
    pub max_connections: u32,
    /// Whether unauthenticated requests are rejected. Disabled only for
    /// local development (`AUTH_MODE=disabled`).
    pub require_auth: bool,
    /// Fixed super-admin token for initial setup, if configured.
    pub bootstrap_admin_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/reloop".to_string());

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .expect("Invalid listen address");

        let max_connections: u32 = std::env::var("MAX_DB_CONNECTIONS")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(10);

        let require_auth = std::env::var("AUTH_MODE")
            .map(|mode| mode != "disabled")
            .unwrap_or(true);

        let bootstrap_admin_token = std::env::var("BOOTSTRAP_ADMIN_TOKEN").ok();

        Self {
            database_url,
            listen_addr,
            max_connections,
            require_auth,
            bootstrap_admin_token,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<SubmissionLifecycle>,
    pub zones: Arc<dyn ZoneStore>,
    pub actors: Arc<dyn ActorDirectory>,
    pub notifications: Arc<dyn NotificationStore>,
    pub tokens: Arc<dyn TokenStore>,
}

/// Initialize the tracing subscriber from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Assemble the full router: authenticated `/api` plus unauthenticated
/// `/health`.
pub fn build_router(state: AppState, auth_state: AuthMiddlewareState) -> Router {
    let api_router = api::rest::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    Router::new()
        .nest("/api", api_router)
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Start the HTTP server.
pub async fn run(config: Config) -> anyhow::Result<()> {
    init_tracing();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    crate::migrations::run_postgres(&pool).await?;

    let tokens: Arc<dyn TokenStore> = Arc::new(PgTokenStore::new(pool.clone()));
    let mut validator = TokenValidator::new(tokens.clone());
    if let Some(bootstrap) = &config.bootstrap_admin_token {
        validator = validator.with_bootstrap_token(bootstrap);
        info!("bootstrap admin token enabled");
    }

    let state = AppState {
        lifecycle: Arc::new(SubmissionLifecycle::new(Arc::new(PgSubmissionStore::new(
            pool.clone(),
        )))),
        zones: Arc::new(PgZoneStore::new(pool.clone())),
        actors: Arc::new(PgActorDirectory::new(pool.clone())),
        notifications: Arc::new(PgNotificationStore::new(pool.clone())),
        tokens,
    };
    let auth_state = AuthMiddlewareState {
        validator: Arc::new(validator),
        require_auth: config.require_auth,
    };

    let router = build_router(state, auth_state);

    info!(addr = %config.listen_addr, "reloop-server listening");
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
