//! # Sale Math
//!
//! The pure half of recording a sale. Storage hands in product snapshots taken
//! under its write lock; this module turns a request plus snapshots into priced
//! lines and a final amount.
//!
//! ## Flow
//! ```text
//! SaleRequest { customer_id?, items[], payment_method }
//!      │
//!      ├── validate_request()   empty? quantity < 1? blank ids?
//!      │
//!      ├── merge_demand()       [A×2, B×1, A×3] → [A×5, B×1]
//!      │                        (stock is checked per product, not per line)
//!      │
//!      │   ... storage decrements stock, returns ProductSnapshot per product ...
//!      │
//!      └── price_lines()        lines keep request order and split,
//!                               total = unit_price × quantity,
//!                               final_amount = Σ totals
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PaymentMethod, SaleLine};

// =============================================================================
// Requests
// =============================================================================

/// One requested line: which product, how many units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: i64,
}

impl LineRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        LineRequest {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Everything needed to record a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    /// `None` for walk-in sales.
    #[serde(default)]
    pub customer_id: Option<String>,
    pub items: Vec<LineRequest>,
    pub payment_method: PaymentMethod,
}

impl SaleRequest {
    /// Starts a walk-in request with no lines.
    pub fn new(payment_method: PaymentMethod) -> Self {
        SaleRequest {
            customer_id: None,
            items: Vec::new(),
            payment_method,
        }
    }

    /// Attributes the sale to a customer.
    pub fn for_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Appends a line.
    pub fn line(mut self, product_id: impl Into<String>, quantity: i64) -> Self {
        self.items.push(LineRequest::new(product_id, quantity));
        self
    }
}

// =============================================================================
// Stock Demand & Snapshots
// =============================================================================

/// Total units requested for one product across all lines of a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDemand {
    pub product_id: String,
    pub quantity: i64,
}

/// Product fields frozen at the moment stock was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
}

/// A product that cannot cover its requested units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockShortfall {
    pub product_id: String,
    pub name: String,
    /// Units on hand when the sale was attempted.
    pub available: i64,
    /// Units the sale asked for (summed over lines).
    pub requested: i64,
}

impl StockShortfall {
    /// How many units are missing.
    #[inline]
    pub fn shortfall(&self) -> i64 {
        self.requested - self.available
    }
}

impl fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): available {}, requested {}, short by {}",
            self.name,
            self.product_id,
            self.available,
            self.requested,
            self.shortfall()
        )
    }
}

/// Lines and amount of a sale, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedSale {
    pub lines: Vec<SaleLine>,
    pub final_amount: Money,
}

// =============================================================================
// Operations
// =============================================================================

/// Rejects malformed requests before storage is touched.
///
/// ## Rules
/// - at least one line ([`CoreError::EmptySale`])
/// - every quantity ≥ 1 ([`CoreError::InvalidQuantity`])
/// - product and customer ids are not blank
pub fn validate_request(request: &SaleRequest) -> CoreResult<()> {
    if request.items.is_empty() {
        return Err(CoreError::EmptySale);
    }

    for line in &request.items {
        if line.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product_id".to_string(),
            }
            .into());
        }
        if line.quantity < 1 {
            return Err(CoreError::InvalidQuantity {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            });
        }
    }

    if let Some(customer_id) = &request.customer_id {
        if customer_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "customer_id".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

/// Sums line quantities per product, in order of first appearance.
///
/// ## Example
/// ```rust
/// use medstock_core::sale::{merge_demand, LineRequest};
///
/// let demand = merge_demand(&[
///     LineRequest::new("gloves", 2),
///     LineRequest::new("tape", 1),
///     LineRequest::new("gloves", 3),
/// ])
/// .unwrap();
///
/// assert_eq!(demand[0].product_id, "gloves");
/// assert_eq!(demand[0].quantity, 5);
/// assert_eq!(demand[1].quantity, 1);
/// ```
pub fn merge_demand(items: &[LineRequest]) -> CoreResult<Vec<StockDemand>> {
    let mut demand: Vec<StockDemand> = Vec::with_capacity(items.len());

    for line in items {
        match demand.iter_mut().find(|d| d.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or_else(quantity_out_of_range)?;
            }
            None => demand.push(StockDemand {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            }),
        }
    }

    Ok(demand)
}

/// Prices every requested line from the snapshots taken by storage.
///
/// Lines keep the request's order and split; a product listed twice yields two
/// lines with the same frozen price.
///
/// ## Errors
/// - [`CoreError::UnknownProduct`] if a line has no snapshot
/// - [`ValidationError::OutOfRange`] if an amount would overflow
pub fn price_lines(
    items: &[LineRequest],
    snapshots: &HashMap<String, ProductSnapshot>,
) -> CoreResult<PricedSale> {
    let mut lines = Vec::with_capacity(items.len());
    let mut final_amount = Money::zero();

    for item in items {
        let snapshot = snapshots
            .get(&item.product_id)
            .ok_or_else(|| CoreError::UnknownProduct(item.product_id.clone()))?;

        let total = Money::from_cents(snapshot.unit_price_cents)
            .checked_multiply_quantity(item.quantity)
            .ok_or_else(quantity_out_of_range)?;

        final_amount = final_amount
            .checked_add(total)
            .ok_or_else(quantity_out_of_range)?;

        lines.push(SaleLine {
            product_id: item.product_id.clone(),
            name: snapshot.name.clone(),
            quantity: item.quantity,
            unit_price_cents: snapshot.unit_price_cents,
            total_cents: total.cents(),
        });
    }

    Ok(PricedSale {
        lines,
        final_amount,
    })
}

fn quantity_out_of_range() -> CoreError {
    ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: i64::MAX,
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: &str, name: &str, cents: i64) -> (String, ProductSnapshot) {
        (
            id.to_string(),
            ProductSnapshot {
                product_id: id.to_string(),
                name: name.to_string(),
                unit_price_cents: cents,
            },
        )
    }

    #[test]
    fn test_validate_rejects_empty_sale() {
        let request = SaleRequest::new(PaymentMethod::Cash);
        assert_eq!(validate_request(&request), Err(CoreError::EmptySale));
    }

    #[test]
    fn test_validate_rejects_non_positive_quantities() {
        for qty in [0, -1] {
            let request = SaleRequest::new(PaymentMethod::Card).line("p-1", qty);
            assert_eq!(
                validate_request(&request),
                Err(CoreError::InvalidQuantity {
                    product_id: "p-1".to_string(),
                    quantity: qty,
                })
            );
        }
    }

    #[test]
    fn test_validate_rejects_blank_ids() {
        let request = SaleRequest::new(PaymentMethod::Cash).line("  ", 1);
        assert!(matches!(
            validate_request(&request),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let request = SaleRequest::new(PaymentMethod::Cash)
            .for_customer("")
            .line("p-1", 1);
        assert!(validate_request(&request).is_err());
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let request = SaleRequest::new(PaymentMethod::Cash)
            .for_customer("c-1")
            .line("p-1", 3);
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn test_merge_demand_overflow_is_rejected() {
        let result = merge_demand(&[LineRequest::new("p", i64::MAX), LineRequest::new("p", 1)]);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_price_lines_computes_totals() {
        let snapshots: HashMap<_, _> = [snapshot("p-1", "Gauze", 10000)].into_iter().collect();
        let priced = price_lines(&[LineRequest::new("p-1", 3)], &snapshots).unwrap();

        assert_eq!(priced.final_amount.to_string(), "300.00");
        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].name, "Gauze");
        assert_eq!(priced.lines[0].total_cents, 30000);
    }

    #[test]
    fn test_price_lines_keeps_request_order_and_split() {
        let snapshots: HashMap<_, _> = [
            snapshot("gloves", "Nitrile Gloves", 1250),
            snapshot("tape", "Surgical Tape", 499),
        ]
        .into_iter()
        .collect();

        let items = [
            LineRequest::new("gloves", 2),
            LineRequest::new("tape", 1),
            LineRequest::new("gloves", 1),
        ];
        let priced = price_lines(&items, &snapshots).unwrap();

        let ids: Vec<_> = priced.lines.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, ["gloves", "tape", "gloves"]);
        assert_eq!(priced.final_amount.cents(), 2500 + 499 + 1250);
    }

    #[test]
    fn test_price_lines_without_snapshot_is_unknown_product() {
        let result = price_lines(&[LineRequest::new("ghost", 1)], &HashMap::new());
        assert_eq!(result, Err(CoreError::UnknownProduct("ghost".to_string())));
    }

    #[test]
    fn test_shortfall_display() {
        let shortfall = StockShortfall {
            product_id: "p-1".to_string(),
            name: "Gauze".to_string(),
            available: 1,
            requested: 4,
        };
        assert_eq!(shortfall.shortfall(), 3);
        assert_eq!(
            shortfall.to_string(),
            "Gauze (p-1): available 1, requested 4, short by 3"
        );
    }
}
