//! # Back-Office Configuration
//!
//! Settings for the back-office process: where the database lives, which
//! time zone "today" is measured in, and the UI preferences from the
//! Settings page.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MEDSTOCK_DB_PATH=/srv/medstock/medstock.db                         │
//! │     MEDSTOCK_TIME_ZONE=Europe/Istanbul                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/backoffice/config.toml (Linux)                           │
//! │     ~/Library/Application Support/com.medstock.backoffice/config.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     UTC, 5 low-stock rows, light theme                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/srv/medstock/medstock.db"
//! max_connections = 5
//! busy_timeout_secs = 5
//!
//! [reporting]
//! time_zone = "Europe/Istanbul"
//! low_stock_preview = 5
//!
//! [preferences]
//! theme = "dark"
//! show_dashboard_stats = true
//! show_low_stock_alerts = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use directories::ProjectDirs;
use medstock_core::report::DEFAULT_LOW_STOCK_PREVIEW;
use medstock_db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "medstock.db";

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown time zone: '{0}'")]
    UnknownTimeZone(String),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("No config directory available on this platform")]
    NoConfigDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. Falls back to the platform data directory when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a writer waits on a locked database before the sale is
    /// reported as a storage conflict.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout() -> u64 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout(),
        }
    }
}

// =============================================================================
// Reporting Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingSettings {
    /// IANA zone name; the dashboard's "today" runs midnight to midnight here.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Rows shown in the dashboard's low-stock panel.
    #[serde(default = "default_low_stock_preview")]
    pub low_stock_preview: u32,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_low_stock_preview() -> u32 {
    DEFAULT_LOW_STOCK_PREVIEW
}

impl Default for ReportingSettings {
    fn default() -> Self {
        ReportingSettings {
            time_zone: default_time_zone(),
            low_stock_preview: default_low_stock_preview(),
        }
    }
}

// =============================================================================
// UI Preferences
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ConfigError::Invalid(format!(
                "Unknown theme: '{}'. Valid options: light, dark",
                other
            ))),
        }
    }
}

/// Settings-page toggles. Purely presentational: they decide what the
/// dashboard handler returns, never what gets recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,

    #[serde(default = "default_true")]
    pub show_dashboard_stats: bool,

    #[serde(default = "default_true")]
    pub show_low_stock_alerts: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            theme: Theme::default(),
            show_dashboard_stats: true,
            show_low_stock_alerts: true,
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete back-office configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub reporting: ReportingSettings,

    #[serde(default)]
    pub preferences: Preferences,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file, creating the parent directory.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.reporting.low_stock_preview == 0 {
            return Err(ConfigError::Invalid(
                "low_stock_preview must be greater than 0".into(),
            ));
        }

        self.time_zone()?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `MEDSTOCK_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("MEDSTOCK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(tz) = lookup("MEDSTOCK_TIME_ZONE") {
            debug!(time_zone = %tz, "Overriding time zone from environment");
            self.reporting.time_zone = tz;
        }

        if let Some(theme) = lookup("MEDSTOCK_THEME") {
            match theme.parse() {
                Ok(parsed) => self.preferences.theme = parsed,
                Err(_) => warn!(theme = %theme, "Unknown theme in environment"),
            }
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "medstock", "backoffice")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The reporting time zone.
    pub fn time_zone(&self) -> ConfigResult<Tz> {
        let name = self.reporting.time_zone.trim();
        name.parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimeZone(name.to_string()))
    }

    /// Resolved database file: the configured path, or `medstock.db` in the
    /// platform data directory (created if missing).
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs().ok_or(ConfigError::NoConfigDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    /// Pool settings for [`medstock_db::Database::new`].
    pub fn db_config(&self) -> ConfigResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?)
            .max_connections(self.database.max_connections)
            .busy_timeout(Duration::from_secs(self.database.busy_timeout_secs)))
    }
}
