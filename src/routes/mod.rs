//! Route tables and the fully layered application router.

mod common;
mod example;

pub use common::common_routes;
pub use example::example_routes;

use crate::error::SettingsError;
use crate::logging::access_log;
use crate::settings::CorsSettings;
use crate::state::AppState;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{middleware, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

/// All routes under `app.base_url`, with body limit, CORS and (optionally) access log.
pub fn app(state: AppState) -> Result<Router, SettingsError> {
    let settings = Arc::clone(&state.settings);
    let routes = Router::new()
        .merge(common_routes(state.clone()))
        .merge(example_routes(state));

    let base = settings.app.base_url.trim_end_matches('/');
    let router = if base.is_empty() {
        routes
    } else {
        Router::new().nest(base, routes)
    };

    let router = router.layer(
        ServiceBuilder::new()
            .layer(RequestBodyLimitLayer::new(settings.app.client_max_size))
            .layer(cors_layer(&settings.app.cors)?),
    );
    if settings.logs.access_log {
        return Ok(router.layer(middleware::from_fn_with_state(settings, access_log)));
    }
    Ok(router)
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v.trim() == "*")
}

/// CORS from settings. A `*` entry combined with credentials mirrors the request,
/// since browsers reject a literal `*` on credentialed requests.
pub fn cors_layer(cors: &CorsSettings) -> Result<CorsLayer, SettingsError> {
    let credentials = cors.allow_credentials;

    let origin = if is_wildcard(&cors.allow_origins) {
        if credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        let origins = cors
            .allow_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o.trim())
                    .map_err(|e| SettingsError::invalid("app.cors.allow_origins", format!("'{}': {}", o, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let methods = if is_wildcard(&cors.allow_methods) {
        if credentials {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::any()
        }
    } else {
        let methods = cors
            .allow_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.trim().to_uppercase().as_bytes())
                    .map_err(|e| SettingsError::invalid("app.cors.allow_methods", format!("'{}': {}", m, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowMethods::list(methods)
    };

    let headers = if is_wildcard(&cors.allow_headers) {
        if credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::any()
        }
    } else {
        let headers = cors
            .allow_headers
            .iter()
            .map(|h| {
                HeaderName::from_bytes(h.trim().as_bytes())
                    .map_err(|e| SettingsError::invalid("app.cors.allow_headers", format!("'{}': {}", h, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowHeaders::list(headers)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials))
}
