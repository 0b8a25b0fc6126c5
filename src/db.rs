// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use crate::config::DatabaseConfig;
use anyhow::{anyhow, Context, Result};
use diesel::Connection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection = Object<AsyncPgConnection>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database manager for the feed
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create the connection pool, check connectivity and apply pending migrations
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);
        let pool = DbPool::builder(manager)
            .max_size(config.max_connections)
            .build()
            .context("Failed to build database pool")?;

        let db = Self { pool };
        db.initialize(&config.url).await?;
        Ok(db)
    }

    async fn initialize(&self, url: &str) -> Result<()> {
        // Test connection by getting a connection from the pool
        let _conn = self
            .pool
            .get()
            .await
            .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;
        info!("Successfully connected to the database");

        // The migration harness is synchronous; keep it off the runtime threads
        let url = url.to_string();
        tokio::task::spawn_blocking(move || run_migrations(&url))
            .await
            .context("Migration task panicked")??;

        Ok(())
    }

    /// Get the database connection pool reference
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn run_migrations(url: &str) -> Result<()> {
    let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(url)
        .context("Failed to open migration connection")?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("Failed to apply migrations: {}", e))?;
    info!("Database migrations applied successfully ({} new)", applied.len());
    Ok(())
}
