//! HTTP API front end

pub mod routes;
pub mod staging;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Build the router over prepared application state
pub fn router(state: AppState) -> Router {
    let max_upload = state.config().server.max_upload_size;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route(
            "/upload",
            post(routes::upload).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/query", post(routes::query))
        .route("/stats", get(routes::stats))
        .route("/clear", delete(routes::clear))
        .route("/config", get(routes::config))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Document Q&A HTTP server
pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    /// Connect state (engine, loader) and prepare the server
    pub async fn connect(config: AppConfig) -> Result<Self> {
        let state = AppState::connect(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Address the server will bind to
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }

    /// Bind and serve until the process exits
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address: {}", e)))?;

        let router = router(self.state);

        tracing::info!("Starting document Q&A server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Config(format!("server error: {}", e)))?;

        Ok(())
    }
}
