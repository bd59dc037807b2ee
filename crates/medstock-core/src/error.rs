//! # Error Types
//!
//! Domain-specific error types for medstock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medstock-core errors (this file)                                      │
//! │  ├── CoreError        - Sale rejections (stock, ids, quantities)       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  medstock-db errors (separate crate)                                   │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── SaleError        - CoreError | DbError from the sale processor    │
//! │                                                                         │
//! │  backoffice errors (app)                                               │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SaleError → ApiError → UI         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` is local and recoverable: the caller either corrects the
//! request or, for [`CoreError::StorageConflict`], retries it unchanged.

use thiserror::Error;

use crate::sale::StockShortfall;

// =============================================================================
// Core Error
// =============================================================================

/// Reasons a sale is rejected.
///
/// A rejected sale never leaves a trace: no stock moved, no spend recorded,
/// no sale row written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The request contained no lines.
    #[error("Sale must contain at least one item")]
    EmptySale,

    /// A line asked for zero or a negative number of units.
    #[error("Invalid quantity {quantity} for product {product_id}: must be at least 1")]
    InvalidQuantity { product_id: String, quantity: i64 },

    /// A line references a product id that does not exist.
    #[error("Product not found: {0}")]
    UnknownProduct(String),

    /// The sale references a customer id that does not exist.
    #[error("Customer not found: {0}")]
    UnknownCustomer(String),

    /// One or more products do not have enough units on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// Sell 3 × Nitrile Gloves
    ///      │
    ///      ▼
    /// Check stock: available=1
    ///      │
    ///      ▼
    /// InsufficientStock { shortfalls: [Nitrile Gloves: short by 2] }
    ///      │
    ///      ▼
    /// UI shows: "Nitrile Gloves: available 1, requested 3, short by 2"
    /// ```
    #[error("Insufficient stock: {}", describe_shortfalls(.shortfalls))]
    InsufficientStock { shortfalls: Vec<StockShortfall> },

    /// Concurrent writers collided; nothing was committed.
    #[error("Storage conflict, nothing was committed; retry the sale: {0}")]
    StorageConflict(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True when retrying the identical request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::StorageConflict(_))
    }

    /// The shortfalls carried by an `InsufficientStock` error, if any.
    pub fn shortfalls(&self) -> &[StockShortfall] {
        match self {
            CoreError::InsufficientStock { shortfalls } => shortfalls,
            _ => &[],
        }
    }
}

fn describe_shortfalls(shortfalls: &[StockShortfall]) -> String {
    shortfalls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any storage is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_names_product_and_shortfall() {
        let err = CoreError::InsufficientStock {
            shortfalls: vec![
                StockShortfall {
                    product_id: "p-1".to_string(),
                    name: "Nitrile Gloves (M)".to_string(),
                    available: 1,
                    requested: 3,
                },
                StockShortfall {
                    product_id: "p-2".to_string(),
                    name: "Alcohol Swabs".to_string(),
                    available: 0,
                    requested: 2,
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "Insufficient stock: Nitrile Gloves (M) (p-1): available 1, requested 3, short by 2; \
             Alcohol Swabs (p-2): available 0, requested 2, short by 2"
        );
        assert_eq!(err.shortfalls().len(), 2);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_only_storage_conflict_is_retryable() {
        assert!(CoreError::StorageConflict("database is locked".to_string()).is_retryable());
        assert!(!CoreError::EmptySale.is_retryable());
        assert!(!CoreError::UnknownProduct("x".to_string()).is_retryable());
        assert!(CoreError::EmptySale.shortfalls().is_empty());
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "restock quantity".to_string(),
        };
        assert_eq!(err.to_string(), "restock quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
