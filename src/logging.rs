//! Tracing subscriber setup and the HTTP access log.

use crate::error::SettingsError;
use crate::settings::{sentry_dsn, LogSettings, Settings};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Target used for access log events.
pub const ACCESS_TARGET: &str = "access";

/// Filter used when `RUST_LOG` is not set: the configured level plus quieter defaults for dependencies.
pub fn default_directives(logs: &LogSettings) -> String {
    format!(
        "{},sqlx=warn,aws_config=error,aws_smithy_runtime=error,hyper=info,h2=info",
        logs.log_level.to_lowercase()
    )
}

/// Install the global subscriber: text for LOCAL, JSON lines elsewhere.
/// Error events also go to Sentry when `logs.sentry.enabled`.
pub fn init(settings: &Settings) -> Result<(), SettingsError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&settings.logs)))
        .map_err(|e| SettingsError::invalid("logs.log_level", e.to_string()))?;
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(settings.logs.sentry.enabled.then(sentry_tracing::layer));
    let installed = if settings.is_local() {
        registry.with(fmt::layer()).try_init()
    } else {
        registry.with(fmt::layer().json().flatten_event(true)).try_init()
    };
    installed.map_err(|e| SettingsError::invalid("logs", e.to_string()))
}

/// Start the Sentry client when enabled. The guard flushes pending events on drop,
/// so it must outlive the command.
pub fn init_error_reporting(settings: &Settings) -> Result<Option<sentry::ClientInitGuard>, SettingsError> {
    if !settings.logs.sentry.enabled {
        return Ok(None);
    }
    let dsn = sentry_dsn(&settings.logs.sentry)?;
    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        environment: Some(settings.env.clone().into()),
        release: sentry::release_name!(),
        ..Default::default()
    });
    Ok(Some(guard))
}

/// `unlog_path` entries are relative to `base_url`, so the prefix is stripped before comparing.
pub fn is_logged(path: &str, base_url: &str, logs: &LogSettings) -> bool {
    let base = base_url.trim_end_matches('/');
    let route = match path.strip_prefix(base) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    };
    !logs.unlog_path.iter().any(|p| p == route)
}

/// One line per request: method, path, status, latency. Paths in `unlog_path` are skipped.
pub async fn access_log(State(settings): State<Arc<Settings>>, req: Request, next: Next) -> Response {
    if !is_logged(req.uri().path(), &settings.app.base_url, &settings.logs) {
        return next.run(req).await;
    }
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(req).await;
    tracing::info!(
        target: ACCESS_TARGET,
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
