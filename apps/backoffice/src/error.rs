//! # API Error Type
//!
//! Unified error type returned by every back-office handler.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Back Office                        │
//! │                                                                         │
//! │  UI                          Rust Backend                               │
//! │  ──                          ────────────                               │
//! │                                                                         │
//! │  recordSale(...)                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler: Result<T, ApiError>                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Sale rejected? ──── SaleError::Rejected(CoreError) ──┐         │  │
//! │  │         │                                             │         │  │
//! │  │         ▼                                             ▼         │  │
//! │  │  Store failed? ───── SaleError::Storage(DbError) ── ApiError ──►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code = "INSUFFICIENT_STOCK"                                          │
//! │  e.message = "Insufficient stock: Nitrile Gloves (M): available 1, ..." │
//! │  e.shortfalls = [{ product_id, name, short_by, ... }]                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures are logged in full here and reach the UI as a generic
//! message; rejections carry their own wording since it names products.

use medstock_core::{CoreError, StockShortfall, ValidationError};
use medstock_db::{DbError, SaleError};
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned from back-office handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock: Nitrile Gloves (M): available 1, requested 3, short by 2",
///   "retryable": false,
///   "shortfalls": [
///     { "product_id": "…", "name": "Nitrile Gloves (M)", "available": 1, "requested": 3, "short_by": 2 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// True when the identical request may succeed if sent again.
    pub retryable: bool,

    /// Every product the sale could not cover (insufficient stock only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shortfalls: Vec<ShortfallDto>,
}

/// One short product, as the UI shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortfallDto {
    pub product_id: String,
    pub name: String,
    pub available: i64,
    pub requested: i64,
    pub short_by: i64,
}

impl From<&StockShortfall> for ShortfallDto {
    fn from(s: &StockShortfall) -> Self {
        ShortfallDto {
            product_id: s.product_id.clone(),
            name: s.name.clone(),
            available: s.available,
            requested: s.requested,
            short_by: s.shortfall(),
        }
    }
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Not enough units on hand for one or more lines (422)
    InsufficientStock,

    /// Lost a race with another writer; safe to retry (409)
    StorageConflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Configuration could not be read, written or validated
    ConfigError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            retryable: false,
            shortfalls: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    fn conflict(message: impl Into<String>) -> Self {
        ApiError {
            retryable: true,
            ..ApiError::new(ErrorCode::StorageConflict, message)
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::validation(format!(
                "{} '{}' already exists",
                field, value
            )),
            DbError::Validation(e) => ApiError::validation(e.to_string()),
            DbError::Conflict(e) => {
                tracing::warn!("Database busy: {}", e);
                ApiError::conflict("The store is busy, nothing was saved; try again")
            }
            DbError::PoolExhausted => {
                ApiError::conflict("All database connections are in use; try again")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts sale rejections to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::UnknownProduct(id) => ApiError::not_found("Product", &id),
            CoreError::UnknownCustomer(id) => ApiError::not_found("Customer", &id),
            CoreError::InsufficientStock { shortfalls } => ApiError {
                shortfalls: shortfalls.iter().map(ShortfallDto::from).collect(),
                ..ApiError::new(ErrorCode::InsufficientStock, message)
            },
            CoreError::StorageConflict(_) => ApiError::conflict(message),
            CoreError::EmptySale
            | CoreError::InvalidQuantity { .. }
            | CoreError::Validation(_) => ApiError::validation(message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::Rejected(e) => e.into(),
            SaleError::Storage(e) => e.into(),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn gloves_short() -> StockShortfall {
        StockShortfall {
            product_id: "p-gloves".to_string(),
            name: "Nitrile Gloves (M)".to_string(),
            available: 1,
            requested: 3,
        }
    }

    #[test]
    fn test_insufficient_stock_carries_every_shortfall() {
        let err: ApiError = CoreError::InsufficientStock {
            shortfalls: vec![gloves_short()],
        }
        .into();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Nitrile Gloves (M)"));
        assert!(!err.is_retryable());
        assert_eq!(err.shortfalls.len(), 1);
        assert_eq!(err.shortfalls[0].short_by, 2);

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_STOCK");
        assert_eq!(json["shortfalls"][0]["product_id"], "p-gloves");
        assert_eq!(json["shortfalls"][0]["short_by"], 2);
    }

    #[test]
    fn test_conflicts_are_retryable() {
        let err: ApiError = SaleError::Rejected(CoreError::StorageConflict("busy".into())).into();
        assert_eq!(err.code, ErrorCode::StorageConflict);
        assert!(err.is_retryable());

        let err: ApiError = DbError::PoolExhausted.into();
        assert_eq!(err.code, ErrorCode::StorageConflict);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_storage_details_stay_in_logs() {
        let err: ApiError =
            SaleError::Storage(DbError::QueryFailed("no such table: sales".into())).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("no such table"));
    }

    #[test]
    fn test_rejections_map_to_client_codes() {
        let err: ApiError = CoreError::UnknownCustomer("c-404".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Customer not found: c-404");

        let err: ApiError = CoreError::EmptySale.into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // Shortfalls are omitted from the payload when there are none
        let json = serde_json::to_value(&err).unwrap();
        assert!(json.get("shortfalls").is_none());
    }

    #[test]
    fn test_display() {
        let err = ApiError::not_found("Customer", "c-1");
        assert_eq!(err.to_string(), "[NotFound] Customer not found: c-1");
    }
}
