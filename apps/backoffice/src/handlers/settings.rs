//! # Settings Handlers
//!
//! Theme and dashboard-panel toggles. Changes are written to the config
//! file before they take effect.

use crate::config::Preferences;
use crate::error::ApiError;
use crate::state::ConfigState;

pub async fn get_preferences(config: &ConfigState) -> Preferences {
    config.preferences().await
}

pub async fn update_preferences(
    config: &ConfigState,
    preferences: Preferences,
) -> Result<Preferences, ApiError> {
    Ok(config.update_preferences(preferences).await?)
}
