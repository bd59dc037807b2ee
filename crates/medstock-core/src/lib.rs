//! # medstock-core: Pure Business Logic for Medstock
//!
//! Domain types and the pure parts of the sale and reporting engine for a
//! small medical-supply business. Zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Medstock Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          UI (customers, dashboard, settings) + session layer    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ already-authorized calls               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 backoffice (service boundary)                   │   │
//! │  │    record_sale, dashboard, low_stock, customer_purchases        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ medstock-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   sale    │  │  report   │  │   │
//! │  │   │  Product  │  │   Money   │  │  validate │  │  windows  │  │   │
//! │  │   │   Sale    │  │  parse    │  │  price    │  │  summary  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         medstock-db (SQLite store, atomic sale commit)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, PaymentMethod)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`sale`] - Sale request validation and line pricing
//! - [`report`] - Dashboard windows and result types
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation for catalog and customer records
//!
//! ## Example Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use medstock_core::sale::{price_lines, ProductSnapshot, SaleRequest};
//! use medstock_core::PaymentMethod;
//!
//! let request = SaleRequest::new(PaymentMethod::Cash).line("gauze", 3);
//!
//! let snapshots = HashMap::from([(
//!     "gauze".to_string(),
//!     ProductSnapshot {
//!         product_id: "gauze".to_string(),
//!         name: "Sterile Gauze".to_string(),
//!         unit_price_cents: 10000,
//!     },
//! )]);
//!
//! let priced = price_lines(&request.items, &snapshots).unwrap();
//! assert_eq!(priced.final_amount.to_string(), "300.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{DashboardSummary, ReportWindow, SalesTotals};
pub use sale::{LineRequest, SaleRequest, StockShortfall};
pub use types::*;
