//! PostgreSQL connection pool component.

use crate::components::Component;
use crate::error::AppError;
use crate::settings::PgSettings;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::RwLock;
use std::time::Duration;

pub struct Postgres {
    settings: PgSettings,
    pool: RwLock<Option<PgPool>>,
}

impl Postgres {
    pub fn new(settings: &PgSettings) -> Self {
        Postgres {
            settings: settings.clone(),
            pool: RwLock::new(None),
        }
    }

    /// Handle to the running pool. Fails when the component is not started.
    pub fn pool(&self) -> Result<PgPool, AppError> {
        self.pool
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or(AppError::NotStarted("pg"))
    }

    fn pool_options(&self) -> Result<(PgPoolOptions, PgConnectOptions), AppError> {
        let conn = &self.settings.connection;
        let connect = PgConnectOptions::from_str(&conn.dsn)?
            .statement_cache_capacity(conn.statement_cache_size)
            .options([("search_path", format!("{},public", self.settings.schema_name))]);
        let pool = PgPoolOptions::new()
            .min_connections(conn.min_size)
            .max_connections(conn.max_size)
            .idle_timeout(Duration::from_secs(conn.max_inactive_connection_lifetime))
            .acquire_timeout(Duration::from_secs(conn.timeout));
        Ok((pool, connect))
    }
}

#[async_trait]
impl Component for Postgres {
    async fn start(&self) -> Result<(), AppError> {
        if self.pool().is_ok() {
            return Ok(());
        }
        let (options, connect) = self.pool_options()?;
        let pool = options.connect_with(connect).await?;
        tracing::info!(
            max_size = self.settings.connection.max_size,
            schema = %self.settings.schema_name,
            "postgres pool started"
        );
        if let Ok(mut guard) = self.pool.write() {
            *guard = Some(pool);
        }
        Ok(())
    }

    async fn stop(&self) {
        let pool = self.pool.write().ok().and_then(|mut guard| guard.take());
        if let Some(pool) = pool {
            pool.close().await;
            tracing::info!("postgres pool closed");
        }
    }

    async fn is_alive(&self) -> Result<bool, AppError> {
        let pool = self.pool()?;
        if pool.is_closed() {
            return Ok(false);
        }
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(true)
    }
}
