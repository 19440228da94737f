//! Management commands behind the `manage` binary.

use crate::components::{Component, Postgres};
use crate::context::AppContext;
use crate::dao::Dao;
use crate::error::AppError;
use crate::routes::app;
use crate::settings::Settings;
use crate::state::AppState;
use sqlx::postgres::PgQueryResult;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve HTTP on `app.host:app.port` until Ctrl-C or SIGTERM, then stop the container.
pub async fn start_web(settings: Arc<Settings>) -> Result<(), AppError> {
    let ctx = Arc::new(AppContext::new(Arc::clone(&settings)));
    let state = AppState::new(Arc::clone(&ctx))?;
    let router = app(state)?;

    ctx.start().await?;
    let listener = match TcpListener::bind((settings.app.host.as_str(), settings.app.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            ctx.stop().await;
            return Err(e.into());
        }
    };
    tracing::info!("listening on {}", listener.local_addr()?);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    ctx.stop().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("server stopped by user"),
        _ = terminate => tracing::info!("terminate signal received, shutting down"),
    }
}

/// Run the file at `path` as one SQL batch against the configured database.
/// The file is read before any connection is made; the pool is closed whatever the outcome.
pub async fn apply_sql(settings: &Settings, path: &Path) -> Result<PgQueryResult, AppError> {
    let bytes = tokio::fs::read(path).await?;
    let script = String::from_utf8(bytes)
        .map_err(|e| AppError::BadRequest(format!("{} is not valid UTF-8: {}", path.display(), e)))?;

    let pg = Postgres::new(&settings.pg);
    pg.start().await?;
    let result = match pg.pool() {
        Ok(pool) => {
            Dao::new(pool, settings.pg.schema_name.clone())
                .execute_script(&script)
                .await
        }
        Err(e) => Err(e),
    };
    pg.stop().await;

    let result = result?;
    tracing::debug!(path = %path.display(), rows_affected = result.rows_affected(), "script applied");
    Ok(result)
}
