//! # Repository Module
//!
//! Database repository implementations for Medstock.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Backoffice handler                                                    │
//! │       │                                                                 │
//! │       │  db.sales().record_sale(&request)                              │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── record_sale(&self, request)                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── purchases_for(&self, customer_id)                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog and restock
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer records
//! - [`SaleRepository`](sale::SaleRepository) - Sale processor and purchase history
//! - [`ReportRepository`](report::ReportRepository) - Dashboard and low-stock queries

pub mod customer;
pub mod product;
pub mod report;
pub mod sale;
