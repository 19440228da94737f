//! Shared application state for all routes.

use crate::auth::JwtKeys;
use crate::context::AppContext;
use crate::error::SettingsError;
use crate::settings::Settings;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<AppContext>,
    pub settings: Arc<Settings>,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(ctx: Arc<AppContext>) -> Result<Self, SettingsError> {
        let settings = Arc::clone(ctx.settings());
        let jwt = Arc::new(JwtKeys::from_settings(&settings.auth)?);
        Ok(AppState { ctx, settings, jwt })
    }
}
