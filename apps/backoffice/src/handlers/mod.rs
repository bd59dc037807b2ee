//! # Handlers
//!
//! One async function per back-office operation. Every handler borrows the
//! state it needs, returns a DTO, and maps failures to [`ApiError`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler                 Reads / Writes                                 │
//! │  ───────                 ──────────────                                 │
//! │  record_sale             stock, sales, customer spend (one transaction) │
//! │  get_sale                sales                                          │
//! │  dashboard, home         catalog counts, sales in today/week windows    │
//! │  low_stock               catalog                                        │
//! │  customer_purchases      sales for one customer                         │
//! │  list_customers          customers                                      │
//! │  restock                 one product's stock                            │
//! │  preferences             config file                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ApiError`]: crate::error::ApiError

pub mod customer;
pub mod report;
pub mod sale;
pub mod settings;

pub use customer::{customer_purchases, list_customers};
pub use report::{dashboard, dashboard_at, home, home_at, low_stock};
pub use sale::{get_sale, record_sale, restock};
pub use settings::{get_preferences, update_preferences};

#[cfg(test)]
pub(crate) mod test_support {
    use medstock_core::{PaymentMethod, SaleRequest};
    use medstock_db::{Database, DbConfig, NewCustomer, NewProduct};

    use crate::config::AppConfig;
    use crate::state::{ConfigState, DbState};

    pub async fn db_state() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    pub fn config_state(config: AppConfig) -> ConfigState {
        ConfigState::new(config, None)
    }

    pub async fn product(db: &DbState, name: &str, cents: i64, qty: i64, min: i64) -> String {
        db.inner()
            .products()
            .insert(NewProduct::new(name, cents).stock(qty, min))
            .await
            .unwrap()
            .id
    }

    pub async fn customer(db: &DbState, name: &str) -> String {
        db.inner()
            .customers()
            .insert(NewCustomer::new(name))
            .await
            .unwrap()
            .id
    }

    pub async fn sell(db: &DbState, customer_id: Option<&str>, product_id: &str, qty: i64) {
        let mut request = SaleRequest::new(PaymentMethod::Cash).line(product_id, qty);
        if let Some(id) = customer_id {
            request = request.for_customer(id);
        }
        db.inner().sales().record_sale(&request).await.unwrap();
    }
}
