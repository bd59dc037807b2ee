//! # medstock-backoffice
//!
//! Service boundary between the back-office UI and the store. The UI's
//! session layer authorizes the caller; everything past that point lives
//! here.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Back-Office Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  UI (customers page, dashboard, settings)                         │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │ DTOs in, DTOs / ApiError out         │
//! │                                 ▼                                      │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  handlers::{record_sale, home, dashboard, low_stock,             │  │
//! │  │             customer_purchases, list_customers, restock, ...}    │  │
//! │  │       │                         │                                 │  │
//! │  │       ▼                         ▼                                 │  │
//! │  │  DbState (Database)        ConfigState (AppConfig, RwLock)        │  │
//! │  └───────┬──────────────────────────────────────────────────────────┘  │
//! │          ▼                                                             │
//! │  medstock-db (SQLite, sale processor) ──► medstock-core (rules)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError, Preferences, Theme};
pub use error::{ApiError, ErrorCode};
pub use state::{ConfigState, DbState};

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show all debug messages
/// - `RUST_LOG=medstock=trace` - Trace level for our crates
/// - Default: `info,medstock=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,medstock=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}
