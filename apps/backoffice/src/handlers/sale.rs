//! # Sale Handlers
//!
//! Recording a sale, looking one up, and restocking.
//!
//! ## Record Flow
//! ```text
//! RecordSaleInput (UI form)
//!      │ into_request: payment method parsed, blank customer = walk-in
//!      ▼
//! SaleRepository::record_sale  (single transaction)
//!      │
//!      ├── Ok(Sale) ───────────────► SaleDto
//!      └── Err(SaleError) ─────────► ApiError (INSUFFICIENT_STOCK, ...)
//! ```

use tracing::{debug, info};

use crate::dto::{RecordSaleInput, SaleDto};
use crate::error::ApiError;
use crate::state::DbState;

/// Records a sale. Nothing is written unless every line can be covered.
pub async fn record_sale(db: &DbState, input: RecordSaleInput) -> Result<SaleDto, ApiError> {
    let request = input.into_request()?;

    match db.inner().sales().record_sale(&request).await {
        Ok(sale) => {
            debug!(sale_id = %sale.id, lines = sale.items.len(), "Returning recorded sale");
            Ok(SaleDto::from(sale))
        }
        Err(err) => {
            let err = ApiError::from(err);
            debug!(code = ?err.code, retryable = err.retryable, "Sale not recorded: {}", err.message);
            Err(err)
        }
    }
}

pub async fn get_sale(db: &DbState, sale_id: &str) -> Result<SaleDto, ApiError> {
    db.inner()
        .sales()
        .get_by_id(sale_id)
        .await?
        .map(SaleDto::from)
        .ok_or_else(|| ApiError::not_found("Sale", sale_id))
}

/// Adds units to a product; returns the new stock level.
pub async fn restock(db: &DbState, product_id: &str, quantity: i64) -> Result<i64, ApiError> {
    let level = db.inner().products().restock(product_id, quantity).await?;
    info!(product_id = %product_id, added = quantity, level, "Product restocked");
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::SaleLineInput;
    use crate::error::ErrorCode;
    use crate::handlers::test_support::{customer, db_state, product};

    fn input(customer_id: Option<&str>, lines: &[(&str, i64)], payment: &str) -> RecordSaleInput {
        RecordSaleInput {
            customer_id: customer_id.map(str::to_string),
            items: lines
                .iter()
                .map(|(id, qty)| SaleLineInput {
                    product_id: id.to_string(),
                    quantity: *qty,
                })
                .collect(),
            payment_method: payment.to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_sale_returns_wire_dto() {
        let db = db_state().await;
        let p = product(&db, "Sterile Gauze", 10000, 10, 5).await;
        let c = customer(&db, "Deniz Pharmacy").await;

        let sale = record_sale(&db, input(Some(&c), &[(p.as_str(), 3)], "cash"))
            .await
            .unwrap();

        assert_eq!(sale.final_amount, "300.00");
        assert_eq!(sale.items[0].unit_price, "100.00");
        assert_eq!(sale.customer_id.as_deref(), Some(c.as_str()));

        let fetched = get_sale(&db, &sale.id).await.unwrap();
        assert_eq!(fetched, sale);
    }

    #[tokio::test]
    async fn test_record_sale_reports_shortfalls() {
        let db = db_state().await;
        let gloves = product(&db, "Nitrile Gloves (M)", 18900, 1, 5).await;

        let err = record_sale(&db, input(None, &[(gloves.as_str(), 3)], "card"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.shortfalls[0].name, "Nitrile Gloves (M)");
        assert_eq!(err.shortfalls[0].short_by, 2);
    }

    #[tokio::test]
    async fn test_record_sale_input_errors() {
        let db = db_state().await;
        let p = product(&db, "Sterile Gauze", 10000, 10, 5).await;

        let err = record_sale(&db, input(None, &[(p.as_str(), 1)], "cheque"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = record_sale(&db, input(Some("nobody"), &[(p.as_str(), 1)], "cash"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = record_sale(&db, input(None, &[("missing", 1)], "cash"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_get_unknown_sale() {
        let db = db_state().await;
        let err = get_sale(&db, "s-missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_restock_then_sell() {
        let db = db_state().await;
        let p = product(&db, "Pulse Oximeter", 64900, 0, 2).await;

        assert_eq!(restock(&db, &p, 4).await.unwrap(), 4);
        record_sale(&db, input(None, &[(p.as_str(), 4)], "card")).await.unwrap();

        let err = restock(&db, &p, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let err = restock(&db, "missing", 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
