//! Startup validation: reject settings the service cannot run with before anything binds or connects.

use crate::error::SettingsError;
use crate::routes::cors_layer;
use crate::settings::{SentrySettings, Settings};
use jsonwebtoken::Algorithm;
use regex::Regex;
use sentry::types::Dsn;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

/// Plain (unquoted) PostgreSQL identifier.
pub fn is_identifier(name: &str) -> bool {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$")
        .map(|re| re.is_match(name))
        .unwrap_or(false)
}

/// Signing algorithm usable with the RSA PEM key pair in `auth`.
pub fn rsa_algorithm(name: &str) -> Result<Algorithm, SettingsError> {
    let alg = Algorithm::from_str(name)
        .map_err(|_| SettingsError::invalid("auth.algorithms", format!("unknown algorithm '{}'", name)))?;
    match alg {
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => Ok(alg),
        _ => Err(SettingsError::invalid(
            "auth.algorithms",
            format!("'{}' does not use RSA keys", name),
        )),
    }
}

/// The error reporting DSN, parsed. Missing or blank is an error.
pub fn sentry_dsn(sentry: &SentrySettings) -> Result<Dsn, SettingsError> {
    let dsn = sentry
        .dsn
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| SettingsError::invalid("logs.sentry.dsn", "required when sentry is enabled"))?;
    Dsn::from_str(dsn).map_err(|e| SettingsError::invalid("logs.sentry.dsn", e.to_string()))
}

pub fn validate(settings: &Settings) -> Result<(), SettingsError> {
    let app = &settings.app;
    if app.port == 0 {
        return Err(SettingsError::invalid("app.port", "must be non-zero"));
    }
    if !app.base_url.starts_with('/') {
        return Err(SettingsError::invalid("app.base_url", "must start with '/'"));
    }
    if app.client_max_size == 0 {
        return Err(SettingsError::invalid("app.client_max_size", "must be non-zero"));
    }
    cors_layer(&app.cors)?;

    if !settings.doc.route.starts_with('/') {
        return Err(SettingsError::invalid("doc.route", "must start with '/'"));
    }

    let conn = &settings.pg.connection;
    if conn.max_size == 0 {
        return Err(SettingsError::invalid("pg.connection.max_size", "must be at least 1"));
    }
    if conn.min_size > conn.max_size {
        return Err(SettingsError::invalid(
            "pg.connection.min_size",
            format!("{} exceeds max_size {}", conn.min_size, conn.max_size),
        ));
    }
    let scheme = conn.dsn.split_once("://").map(|(scheme, _)| scheme);
    if !matches!(scheme, Some("postgres") | Some("postgresql")) {
        return Err(SettingsError::invalid(
            "pg.connection.dsn",
            "scheme must be postgres:// or postgresql://",
        ));
    }
    PgConnectOptions::from_str(&conn.dsn)
        .map_err(|e| SettingsError::invalid("pg.connection.dsn", e.to_string()))?;
    if !is_identifier(&settings.pg.schema_name) {
        return Err(SettingsError::invalid(
            "pg.schema_name",
            format!("'{}' is not a valid identifier", settings.pg.schema_name),
        ));
    }

    LevelFilter::from_str(&settings.logs.log_level)
        .map_err(|e| SettingsError::invalid("logs.log_level", e.to_string()))?;

    if settings.auth.algorithms.is_empty() {
        return Err(SettingsError::invalid("auth.algorithms", "at least one algorithm is required"));
    }
    for alg in &settings.auth.algorithms {
        rsa_algorithm(alg)?;
    }
    if settings.logs.sentry.enabled {
        sentry_dsn(&settings.logs.sentry)?;
    }

    if settings.s3.enabled {
        if settings.s3.connection.url.trim().is_empty() {
            return Err(SettingsError::invalid("s3.connection.url", "required when s3 is enabled"));
        }
        if settings.s3.bucket.trim().is_empty() {
            return Err(SettingsError::invalid("s3.bucket", "required when s3 is enabled"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(vars: &[(&str, &str)]) -> Result<(), SettingsError> {
        validate(&Settings::from_vars(vars.iter().copied()).unwrap())
    }

    fn invalid_field(result: Result<(), SettingsError>) -> &'static str {
        match result {
            Err(SettingsError::Invalid { field, .. }) => field,
            other => panic!("expected invalid setting, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        with(&[]).unwrap();
    }

    #[test]
    fn pool_bounds() {
        assert_eq!(invalid_field(with(&[("PG__CONNECTION__MAX_SIZE", "0")])), "pg.connection.max_size");
        assert_eq!(
            invalid_field(with(&[("PG__CONNECTION__MIN_SIZE", "5"), ("PG__CONNECTION__MAX_SIZE", "2")])),
            "pg.connection.min_size"
        );
    }

    #[test]
    fn dsn_must_parse() {
        assert_eq!(invalid_field(with(&[("PG__CONNECTION__DSN", "mysql://nope")])), "pg.connection.dsn");
        assert_eq!(invalid_field(with(&[("PG__CONNECTION__DSN", "localhost:5432")])), "pg.connection.dsn");
        with(&[("PG__CONNECTION__DSN", "postgres://u:p@db:5432/app")]).unwrap();
    }

    #[test]
    fn schema_name_is_an_identifier() {
        assert!(is_identifier("app"));
        assert!(is_identifier("_private2"));
        assert!(!is_identifier("2app"));
        assert!(!is_identifier("app; DROP TABLE x"));
        assert_eq!(invalid_field(with(&[("PG__SCHEMA_NAME", "a-b")])), "pg.schema_name");
    }

    #[test]
    fn log_level_and_algorithms() {
        assert_eq!(invalid_field(with(&[("LOGS__LOG_LEVEL", "loud")])), "logs.log_level");
        with(&[("LOGS__LOG_LEVEL", "warn")]).unwrap();
        assert_eq!(invalid_field(with(&[("AUTH__ALGORITHMS", "RS999")])), "auth.algorithms");
        assert_eq!(invalid_field(with(&[("AUTH__ALGORITHMS", "[]")])), "auth.algorithms");
    }

    #[test]
    fn algorithms_must_match_rsa_keys() {
        assert_eq!(invalid_field(with(&[("AUTH__ALGORITHMS", "RS256,HS256")])), "auth.algorithms");
        assert_eq!(invalid_field(with(&[("AUTH__ALGORITHMS", "ES256")])), "auth.algorithms");
        with(&[("AUTH__ALGORITHMS", "RS512,PS256")]).unwrap();
    }

    #[test]
    fn enabled_sentry_needs_a_dsn() {
        assert_eq!(invalid_field(with(&[("LOGS__SENTRY__ENABLED", "true")])), "logs.sentry.dsn");
        assert_eq!(
            invalid_field(with(&[("LOGS__SENTRY__ENABLED", "true"), ("LOGS__SENTRY__DSN", "not a dsn")])),
            "logs.sentry.dsn"
        );
        with(&[("LOGS__SENTRY__DSN", "not a dsn")]).unwrap();
        with(&[
            ("LOGS__SENTRY__ENABLED", "true"),
            ("LOGS__SENTRY__DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();
    }

    #[test]
    fn paths_start_with_slash() {
        assert_eq!(invalid_field(with(&[("APP__BASE_URL", "api")])), "app.base_url");
        assert_eq!(invalid_field(with(&[("DOC__ROUTE", "doc.json")])), "doc.route");
    }

    #[test]
    fn cors_values_must_parse() {
        assert_eq!(
            invalid_field(with(&[("APP__CORS__ALLOW_METHODS", "GET,NOT A METHOD")])),
            "app.cors.allow_methods"
        );
    }
}
