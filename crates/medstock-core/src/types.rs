//! # Domain Types
//!
//! Core domain types used throughout Medstock.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name, brand    │   │  customer_id?   │◄──│  name, phone    │       │
//! │  │  unit_price     │   │  payment_method │   │  total_spent    │       │
//! │  │  quantity       │   │  items[]        │   │  (derived)      │       │
//! │  │  min_quantity   │   │  final_amount   │   └─────────────────┘       │
//! │  └────────┬────────┘   └────────┬────────┘                             │
//! │           │  snapshot at sale   │                                       │
//! │           └──────────────► SaleLine { name, unit_price, qty, total }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership of Mutable Fields
//! - `Product.quantity`: written only by the sale processor and restock
//! - `Customer.total_spent`: written only by the sale processor
//! - `Sale`: append-only, never updated or deleted

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, copied onto every sale line.
    pub name: String,

    pub brand: String,

    pub category: String,

    /// Price in cents.
    pub unit_price_cents: i64,

    /// Units on hand. Never negative.
    pub quantity: i64,

    /// Restock threshold: at or below this the product is low-stock.
    pub min_quantity: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// A product is low-stock when `quantity <= min_quantity`.
    ///
    /// ```text
    /// min_quantity = 5
    ///
    ///   quantity:  0  1  2  3  4  5 │ 6  7  8 ...
    ///              └── low-stock ───┘ └── ok ──
    /// ```
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record with its cached lifetime spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,

    /// Σ `final_amount` of every sale referencing this customer, in cents.
    pub total_spent_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Returns the lifetime spend as Money.
    #[inline]
    pub fn total_spent(&self) -> Money {
        Money::from_cents(self.total_spent_cents)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the canonical names plus the labels the storefront UI sends
/// (`nakit` for cash, `kredi_karti` for card).
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "nakit" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" | "kredi_karti" => Ok(PaymentMethod::Card),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: vec!["cash".to_string(), "card".to_string()],
            }),
        }
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// One line of a committed sale.
///
/// Uses the snapshot pattern: `name` and `unit_price_cents` are frozen at the
/// moment of sale, so later catalog edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Quantity sold, at least 1.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// `unit_price_cents × quantity`.
    pub total_cents: i64,
}

impl SaleLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of one completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// `None` for walk-in sales.
    pub customer_id: Option<String>,
    pub payment_method: PaymentMethod,
    /// Lines in the order they were requested.
    pub items: Vec<SaleLine>,
    /// Σ line totals, in cents.
    pub final_amount_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn final_amount(&self) -> Money {
        Money::from_cents(self.final_amount_cents)
    }

    /// Total units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i64, min_quantity: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Sterile Gauze 10x10".to_string(),
            brand: "Medipad".to_string(),
            category: "Wound Care".to_string(),
            unit_price_cents: 10000,
            quantity,
            min_quantity,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_low_stock_is_inclusive_of_threshold() {
        assert!(!product(7, 5).is_low_stock());
        assert!(!product(6, 5).is_low_stock());
        assert!(product(5, 5).is_low_stock());
        assert!(product(3, 5).is_low_stock());
        assert!(product(0, 0).is_low_stock());
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("Nakit".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!("kredi_karti".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_serde_is_lowercase() {
        let json = serde_json::to_string(&PaymentMethod::Card).unwrap();
        assert_eq!(json, "\"card\"");
        let back: PaymentMethod = serde_json::from_str("\"cash\"").unwrap();
        assert_eq!(back, PaymentMethod::Cash);
    }

    #[test]
    fn test_sale_accessors() {
        let sale = Sale {
            id: "s-1".to_string(),
            customer_id: None,
            payment_method: PaymentMethod::Cash,
            items: vec![
                SaleLine {
                    product_id: "p-1".to_string(),
                    name: "Gauze".to_string(),
                    quantity: 2,
                    unit_price_cents: 250,
                    total_cents: 500,
                },
                SaleLine {
                    product_id: "p-2".to_string(),
                    name: "Tape".to_string(),
                    quantity: 1,
                    unit_price_cents: 199,
                    total_cents: 199,
                },
            ],
            final_amount_cents: 699,
            created_at: Utc::now(),
        };

        assert_eq!(sale.final_amount().to_string(), "6.99");
        assert_eq!(sale.unit_count(), 3);
        assert_eq!(sale.items[0].unit_price().cents(), 250);
    }
}
