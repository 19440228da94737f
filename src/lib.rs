//! API scaffold: settings, PostgreSQL pool, health checks and management commands for a web API backend.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod components;
pub mod context;
pub mod dao;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod service;
pub mod settings;
pub mod state;

pub use auth::{Claims, JwtKeys, TokenKind};
pub use components::Component;
pub use context::AppContext;
pub use dao::Dao;
pub use error::{AppError, SettingsError};
pub use routes::{app, common_routes, example_routes};
pub use settings::Settings;
pub use state::AppState;
