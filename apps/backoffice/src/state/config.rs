//! # Config State
//!
//! Holds the loaded [`AppConfig`] plus the file it came from, so preference
//! changes made in the Settings page can be written back.

use std::path::PathBuf;

use chrono_tz::Tz;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::{AppConfig, ConfigResult, Preferences};

#[derive(Debug)]
pub struct ConfigState {
    config: RwLock<AppConfig>,

    /// Where `save` writes. `None` means the platform default path.
    path: Option<PathBuf>,
}

impl ConfigState {
    pub fn new(config: AppConfig, path: Option<PathBuf>) -> Self {
        ConfigState {
            config: RwLock::new(config),
            path,
        }
    }

    /// A copy of the current configuration.
    pub async fn snapshot(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    pub async fn time_zone(&self) -> ConfigResult<Tz> {
        self.config.read().await.time_zone()
    }

    pub async fn low_stock_preview(&self) -> u32 {
        self.config.read().await.reporting.low_stock_preview
    }

    pub async fn preferences(&self) -> Preferences {
        self.config.read().await.preferences
    }

    /// Replaces the UI preferences and persists the whole config.
    ///
    /// The in-memory value only changes once the file write succeeded.
    pub async fn update_preferences(&self, preferences: Preferences) -> ConfigResult<Preferences> {
        let mut config = self.config.write().await;

        let mut updated = config.clone();
        updated.preferences = preferences;
        updated.save(self.path.clone())?;
        *config = updated;

        info!(theme = %preferences.theme, "Preferences updated");
        Ok(preferences)
    }
}
