// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use social_feed::api::{self, AppState};
use social_feed::config::{Config, LogFormat, StorageBackend};
use social_feed::db::Database;
use social_feed::store::{FeedStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (reads .env if present)
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,social_feed=debug".into()),
    );
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
    info!("Initialized configuration");

    let store: Arc<dyn FeedStore> = match config.storage {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            info!("Connected to database");
            Arc::new(PgStore::new(db.pool().clone()))
        }
        StorageBackend::Memory => {
            info!("Using in-memory store; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    api::start_api_server(&config.server, AppState::new(store)).await?;

    info!("Social feed shutdown complete");
    Ok(())
}
