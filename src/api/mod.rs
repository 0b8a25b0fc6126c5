// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod auth;
pub mod extract;
mod handlers;
pub mod response;

use crate::config::ServerConfig;
use crate::store::FeedStore;
use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use auth::{AuthenticatedUser, USER_ID_HEADER};
pub use extract::{FeedJson, FeedPath};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn FeedStore>) -> Self {
        Self { store }
    }
}

/// Build the full API: every operation set merged into one router
pub fn router(state: AppState) -> Router {
    Router::new()
        // General routes
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::health::get_metrics))
        // Operation sets
        .merge(handlers::content::routes())
        .merge(handlers::analytics::routes())
        .merge(handlers::interactions::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the API server and run until Ctrl-C
pub async fn start_api_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let mut app = router(state);
    if config.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    // Get bind address
    let addr = format!("{}:{}", config.host, config.port).parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Starting API server on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, initiating graceful shutdown"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
