//! # State Module
//!
//! Long-lived state the handlers borrow. Each handler declares exactly which
//! of the two it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────┐      │
//! │  │       DbState        │        │         ConfigState          │      │
//! │  │                      │        │                              │      │
//! │  │  Database            │        │  RwLock<AppConfig>           │      │
//! │  │  (SQLite pool)       │        │  config file path            │      │
//! │  └──────────────────────┘        └──────────────────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: the pool hands out connections; no extra locking           │
//! │  • ConfigState: readers share, preference updates take the write lock  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::ConfigState;
pub use db::DbState;
