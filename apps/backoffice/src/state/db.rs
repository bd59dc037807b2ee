//! # Database State
//!
//! Wraps the `Database` handle the handlers share.
//!
//! The pool inside `Database` is thread-safe, so concurrent handlers (two
//! registers ringing up sales at once) need no locking here; the sale
//! processor's transaction is what keeps them from overselling.

use medstock_db::Database;

use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Opens (and migrates) the database the config points at.
    pub async fn open(config: &AppConfig) -> Result<Self, ApiError> {
        let db = Database::new(config.db_config()?).await?;
        Ok(DbState::new(db))
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }
}
