//! # Customer Handlers
//!
//! The customers page: the list with running spend, and one customer's
//! purchase history, newest first.

use crate::dto::{CustomerDto, SaleDto};
use crate::error::ApiError;
use crate::state::DbState;

pub async fn list_customers(db: &DbState) -> Result<Vec<CustomerDto>, ApiError> {
    let customers = db.inner().customers().list().await?;
    Ok(customers.into_iter().map(CustomerDto::from).collect())
}

/// Every sale for the customer. An unknown id yields an empty list.
pub async fn customer_purchases(
    db: &DbState,
    customer_id: &str,
) -> Result<Vec<SaleDto>, ApiError> {
    let sales = db.inner().sales().purchases_for(customer_id).await?;
    Ok(sales.into_iter().map(SaleDto::from).collect())
}
