//! # Data Transfer Objects
//!
//! What the UI sends and receives. Domain types stay in integer cents; every
//! money field here is a decimal string with exactly two digits (`"300.00"`)
//! and every timestamp is RFC 3339.
//!
//! ```text
//! Sale { final_amount_cents: 30000, created_at: DateTime<Utc> }
//!      │
//!      ▼  SaleDto::from
//! { "final_amount": "300.00", "created_at": "2026-10-18T09:00:00+00:00" }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use medstock_core::{
    Customer, DashboardSummary, Money, PaymentMethod, Product, Sale, SaleLine, SaleRequest,
    ValidationError,
};
use serde::{Deserialize, Serialize};

use crate::config::{Preferences, Theme};

fn money(m: Money) -> String {
    m.to_decimal_string()
}

fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, false)
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineDto {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: String,
    pub total: String,
}

impl From<SaleLine> for SaleLineDto {
    fn from(line: SaleLine) -> Self {
        SaleLineDto {
            unit_price: money(line.unit_price()),
            total: money(line.total()),
            product_id: line.product_id,
            name: line.name,
            quantity: line.quantity,
        }
    }
}

/// A committed sale, as purchase history and the sale receipt show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDto {
    pub id: String,
    pub customer_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub items: Vec<SaleLineDto>,
    pub final_amount: String,
    pub created_at: String,
}

impl From<Sale> for SaleDto {
    fn from(sale: Sale) -> Self {
        SaleDto {
            final_amount: money(sale.final_amount()),
            created_at: timestamp(sale.created_at),
            id: sale.id,
            customer_id: sale.customer_id,
            payment_method: sale.payment_method,
            items: sale.items.into_iter().map(SaleLineDto::from).collect(),
        }
    }
}

/// One requested line of a new sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLineInput {
    pub product_id: String,
    pub quantity: i64,
}

/// New-sale form as submitted by the UI.
///
/// `payment_method` arrives as free text (`"cash"`, `"card"`, or the
/// storefront labels) and `customer_id` may be blank for a walk-in sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSaleInput {
    #[serde(default)]
    pub customer_id: Option<String>,
    pub items: Vec<SaleLineInput>,
    pub payment_method: String,
}

impl RecordSaleInput {
    pub fn into_request(self) -> Result<SaleRequest, ValidationError> {
        let payment_method: PaymentMethod = self.payment_method.parse()?;

        let mut request = SaleRequest::new(payment_method);
        if let Some(id) = self.customer_id.filter(|id| !id.trim().is_empty()) {
            request = request.for_customer(id.trim());
        }
        for line in self.items {
            request = request.line(line.product_id, line.quantity);
        }
        Ok(request)
    }
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardDto {
    pub total_products: i64,
    pub low_stock_count: i64,
    pub today_revenue: String,
    pub today_sales_count: i64,
    pub week_revenue: String,
    pub week_sales_count: i64,
}

impl From<DashboardSummary> for DashboardDto {
    fn from(s: DashboardSummary) -> Self {
        DashboardDto {
            total_products: s.total_products,
            low_stock_count: s.low_stock_count,
            today_revenue: money(s.today_revenue),
            today_sales_count: s.today_sales_count,
            week_revenue: money(s.week_revenue),
            week_sales_count: s.week_sales_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockProductDto {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub quantity: i64,
    pub min_quantity: i64,
    pub unit_price: String,
}

impl From<Product> for LowStockProductDto {
    fn from(p: Product) -> Self {
        LowStockProductDto {
            unit_price: money(p.unit_price()),
            id: p.id,
            name: p.name,
            brand: p.brand,
            category: p.category,
            quantity: p.quantity,
            min_quantity: p.min_quantity,
        }
    }
}

/// The dashboard page. Panels switched off in the preferences are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeDto {
    pub theme: Theme,
    pub summary: Option<DashboardDto>,
    pub low_stock: Option<Vec<LowStockProductDto>>,
}

impl HomeDto {
    pub fn new(
        preferences: &Preferences,
        summary: Option<DashboardSummary>,
        low_stock: Option<Vec<Product>>,
    ) -> Self {
        HomeDto {
            theme: preferences.theme,
            summary: summary.map(DashboardDto::from),
            low_stock: low_stock
                .map(|products| products.into_iter().map(LowStockProductDto::from).collect()),
        }
    }
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub total_spent: String,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        CustomerDto {
            total_spent: money(c.total_spent()),
            id: c.id,
            name: c.name,
            phone: c.phone,
            email: c.email,
            address: c.address,
            notes: c.notes,
        }
    }
}
