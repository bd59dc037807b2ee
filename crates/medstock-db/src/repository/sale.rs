//! # Sale Repository
//!
//! The sale processor and the purchase history reader.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       record_sale(request)                              │
//! │                                                                         │
//! │  1. VALIDATE (pure, no I/O)                                            │
//! │     └── empty? quantity < 1? → rejected, nothing touched               │
//! │                                                                         │
//! │  2. BEGIN                                                              │
//! │     └── for each product (lines merged per product):                   │
//! │         UPDATE products SET quantity = quantity - n                    │
//! │          WHERE id = ? AND quantity >= n  RETURNING name, price         │
//! │           │                                                             │
//! │           ├── row   → snapshot name + price                            │
//! │           └── none  → missing product, or a shortfall to report        │
//! │                                                                         │
//! │  3. any shortfall / unknown id → ROLLBACK, return the rejection        │
//! │                                                                         │
//! │  4. price lines from the snapshots, INSERT sales + sale_items,         │
//! │     UPDATE customers SET total_spent += final_amount                   │
//! │                                                                         │
//! │  5. COMMIT   (all four writes, or none of them)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first statement of the transaction is a write, so SQLite takes the
//! database write lock up front. Two sales that would jointly oversell are
//! serialized on that lock: the second one sees the first one's decrement.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbResult, SaleError};
use medstock_core::sale::{
    merge_demand, price_lines, validate_request, ProductSnapshot, SaleRequest, StockDemand,
    StockShortfall,
};
use medstock_core::{CoreError, PaymentMethod, Sale, SaleLine};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    customer_id: Option<String>,
    payment_method: PaymentMethod,
    final_amount_cents: i64,
    created_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self, items: Vec<SaleLine>) -> Sale {
        Sale {
            id: self.id,
            customer_id: self.customer_id,
            payment_method: self.payment_method,
            items,
            final_amount_cents: self.final_amount_cents,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    sale_id: String,
    product_id: String,
    name: String,
    quantity: i64,
    unit_price_cents: i64,
    total_cents: i64,
}

impl From<SaleItemRow> for SaleLine {
    fn from(row: SaleItemRow) -> Self {
        SaleLine {
            product_id: row.product_id,
            name: row.name,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
            total_cents: row.total_cents,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale stamped with the current time.
    ///
    /// ## Errors
    /// - `Rejected(EmptySale | InvalidQuantity)` for malformed requests
    /// - `Rejected(UnknownProduct | UnknownCustomer)` for dangling ids
    /// - `Rejected(InsufficientStock)` carrying every short product
    /// - `Rejected(StorageConflict)` when the write lock could not be taken
    ///
    /// On any error the store is exactly as it was before the call.
    pub async fn record_sale(&self, request: &SaleRequest) -> Result<Sale, SaleError> {
        self.record_sale_at(request, Utc::now()).await
    }

    /// Records a sale with an explicit timestamp (imports, backfills, tests).
    pub async fn record_sale_at(
        &self,
        request: &SaleRequest,
        created_at: DateTime<Utc>,
    ) -> Result<Sale, SaleError> {
        validate_request(request)?;
        let demand = merge_demand(&request.items)?;

        debug!(
            lines = request.items.len(),
            products = demand.len(),
            customer_id = ?request.customer_id,
            "Recording sale"
        );

        let mut tx = self.pool.begin().await?;

        let outcome = apply_sale(&mut tx, request, &demand, created_at).await;

        match outcome {
            Ok(sale) => {
                tx.commit().await?;
                info!(
                    sale_id = %sale.id,
                    customer_id = ?sale.customer_id,
                    payment_method = %sale.payment_method,
                    final_amount = %sale.final_amount(),
                    "Sale recorded"
                );
                Ok(sale)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback after rejected sale failed");
                }
                warn!(error = %err, retryable = err.is_retryable(), "Sale rejected");
                Err(err)
            }
        }
    }

    /// Gets a sale with its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, customer_id, payment_method, final_amount_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let sale = match row {
            Some(row) => {
                let items: Vec<SaleItemRow> = sqlx::query_as(
                    r#"
                    SELECT sale_id, product_id, name, quantity, unit_price_cents, total_cents
                    FROM sale_items
                    WHERE sale_id = ?1
                    ORDER BY line_no
                    "#,
                )
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

                Some(row.into_sale(items.into_iter().map(SaleLine::from).collect()))
            }
            None => None,
        };

        tx.commit().await?;
        Ok(sale)
    }

    /// A customer's sales, newest first (ties broken by sale id, descending).
    ///
    /// Unknown customers and customers without sales both yield an empty list.
    /// Sales and lines are read from one snapshot.
    pub async fn purchases_for(&self, customer_id: &str) -> DbResult<Vec<Sale>> {
        let mut tx = self.pool.begin().await?;

        let rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, customer_id, payment_method, final_amount_cents, created_at
            FROM sales
            WHERE customer_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&mut *tx)
        .await?;

        let item_rows: Vec<SaleItemRow> = sqlx::query_as(
            r#"
            SELECT i.sale_id, i.product_id, i.name, i.quantity, i.unit_price_cents, i.total_cents
            FROM sale_items i
            JOIN sales s ON s.id = i.sale_id
            WHERE s.customer_id = ?1
            ORDER BY i.sale_id, i.line_no
            "#,
        )
        .bind(customer_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut items_by_sale: HashMap<String, Vec<SaleLine>> = HashMap::new();
        for row in item_rows {
            items_by_sale
                .entry(row.sale_id.clone())
                .or_default()
                .push(row.into());
        }

        let sales = rows
            .into_iter()
            .map(|row| {
                let items = items_by_sale.remove(&row.id).unwrap_or_default();
                row.into_sale(items)
            })
            .collect::<Vec<_>>();

        debug!(customer_id = %customer_id, count = sales.len(), "Loaded purchase history");
        Ok(sales)
    }
}

// =============================================================================
// Sale Processor Internals
// =============================================================================

/// Every write of a sale. The caller commits on `Ok` and rolls back on `Err`.
async fn apply_sale(
    tx: &mut Transaction<'static, Sqlite>,
    request: &SaleRequest,
    demand: &[StockDemand],
    created_at: DateTime<Utc>,
) -> Result<Sale, SaleError> {
    let snapshots = take_stock(&mut **tx, demand).await?;
    let priced = price_lines(&request.items, &snapshots)?;

    let sale = Sale {
        id: Uuid::new_v4().to_string(),
        customer_id: request.customer_id.clone(),
        payment_method: request.payment_method,
        items: priced.lines,
        final_amount_cents: priced.final_amount.cents(),
        created_at,
    };

    // Spend first: an unknown customer must surface as a rejection, not as a
    // foreign-key failure on the sale row.
    if let Some(customer_id) = &sale.customer_id {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET total_spent_cents = total_spent_cents + ?2
            WHERE id = ?1
            "#,
        )
        .bind(customer_id)
        .bind(sale.final_amount_cents)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::UnknownCustomer(customer_id.clone()).into());
        }
    }

    sqlx::query(
        r#"
        INSERT INTO sales (id, customer_id, payment_method, final_amount_cents, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.customer_id)
    .bind(sale.payment_method)
    .bind(sale.final_amount_cents)
    .bind(sale.created_at)
    .execute(&mut **tx)
    .await?;

    for (line_no, line) in sale.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO sale_items (
                sale_id, line_no, product_id, name,
                quantity, unit_price_cents, total_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(line_no as i64)
        .bind(&line.product_id)
        .bind(&line.name)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.total_cents)
        .execute(&mut **tx)
        .await?;
    }

    Ok(sale)
}

/// Decrements stock for every demanded product and snapshots name and price.
///
/// All products are attempted so that a rejection lists every shortfall.
async fn take_stock(
    conn: &mut SqliteConnection,
    demand: &[StockDemand],
) -> Result<HashMap<String, ProductSnapshot>, SaleError> {
    let now = Utc::now();
    let mut snapshots = HashMap::with_capacity(demand.len());
    let mut shortfalls = Vec::new();

    for wanted in demand {
        let taken: Option<(String, i64)> = sqlx::query_as(
            r#"
            UPDATE products
            SET quantity = quantity - ?2,
                updated_at = ?3
            WHERE id = ?1 AND quantity >= ?2
            RETURNING name, unit_price_cents
            "#,
        )
        .bind(&wanted.product_id)
        .bind(wanted.quantity)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some((name, unit_price_cents)) = taken {
            snapshots.insert(
                wanted.product_id.clone(),
                ProductSnapshot {
                    product_id: wanted.product_id.clone(),
                    name,
                    unit_price_cents,
                },
            );
            continue;
        }

        let current: Option<(String, i64)> =
            sqlx::query_as("SELECT name, quantity FROM products WHERE id = ?1")
                .bind(&wanted.product_id)
                .fetch_optional(&mut *conn)
                .await?;

        match current {
            Some((name, available)) => shortfalls.push(StockShortfall {
                product_id: wanted.product_id.clone(),
                name,
                available,
                requested: wanted.quantity,
            }),
            None => return Err(CoreError::UnknownProduct(wanted.product_id.clone()).into()),
        }
    }

    if !shortfalls.is_empty() {
        return Err(CoreError::InsufficientStock { shortfalls }.into());
    }

    Ok(snapshots)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::customer::NewCustomer;
    use crate::repository::product::NewProduct;
    use crate::{Database, DbConfig};
    use medstock_core::Money;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn product(db: &Database, name: &str, cents: i64, qty: i64, min: i64) -> String {
        db.products()
            .insert(NewProduct::new(name, cents).stock(qty, min))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_sale_snapshots_name_and_price() {
        let db = setup().await;
        let gauze = product(&db, "Sterile Gauze", 10000, 10, 5).await;

        let sale = db
            .sales()
            .record_sale(&SaleRequest::new(PaymentMethod::Cash).line(&gauze, 3))
            .await
            .unwrap();

        assert_eq!(sale.final_amount(), Money::from_cents(30000));
        assert_eq!(sale.items[0].name, "Sterile Gauze");
        assert_eq!(sale.items[0].unit_price_cents, 10000);
        assert_eq!(sale.customer_id, None);

        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored, sale);
    }

    #[tokio::test]
    async fn test_lines_keep_request_order_and_split() {
        let db = setup().await;
        let gloves = product(&db, "Nitrile Gloves", 1250, 10, 0).await;
        let tape = product(&db, "Surgical Tape", 499, 10, 0).await;

        let request = SaleRequest::new(PaymentMethod::Card)
            .line(&gloves, 2)
            .line(&tape, 1)
            .line(&gloves, 3);
        let sale = db.sales().record_sale(&request).await.unwrap();

        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        let lines: Vec<_> = stored
            .items
            .iter()
            .map(|l| (l.product_id.as_str(), l.quantity))
            .collect();
        assert_eq!(lines, [(gloves.as_str(), 2), (tape.as_str(), 1), (gloves.as_str(), 3)]);

        let left = db.products().get_by_id(&gloves).await.unwrap().unwrap();
        assert_eq!(left.quantity, 5);
    }

    #[tokio::test]
    async fn test_split_lines_are_checked_against_combined_stock() {
        let db = setup().await;
        let gloves = product(&db, "Nitrile Gloves", 1250, 4, 0).await;

        let request = SaleRequest::new(PaymentMethod::Cash)
            .line(&gloves, 3)
            .line(&gloves, 2);
        let err = db.sales().record_sale(&request).await.unwrap_err();

        let shortfalls = err.rejection().unwrap().shortfalls().to_vec();
        assert_eq!(shortfalls.len(), 1);
        assert_eq!(shortfalls[0].available, 4);
        assert_eq!(shortfalls[0].requested, 5);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_earlier_decrements() {
        let db = setup().await;
        let gauze = product(&db, "Sterile Gauze", 10000, 10, 5).await;

        let request = SaleRequest::new(PaymentMethod::Cash)
            .line(&gauze, 2)
            .line("no-such-product", 1);
        let err = db.sales().record_sale(&request).await.unwrap_err();

        assert!(matches!(
            err,
            SaleError::Rejected(CoreError::UnknownProduct(ref id)) if id == "no-such-product"
        ));
        let p = db.products().get_by_id(&gauze).await.unwrap().unwrap();
        assert_eq!(p.quantity, 10);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_rejected() {
        let db = setup().await;
        let gauze = product(&db, "Sterile Gauze", 10000, 10, 5).await;

        let request = SaleRequest::new(PaymentMethod::Cash)
            .for_customer("ghost")
            .line(&gauze, 1);
        let err = db.sales().record_sale(&request).await.unwrap_err();

        assert!(matches!(
            err,
            SaleError::Rejected(CoreError::UnknownCustomer(_))
        ));
        let p = db.products().get_by_id(&gauze).await.unwrap().unwrap();
        assert_eq!(p.quantity, 10);
        assert!(db.sales().purchases_for("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purchases_newest_first() {
        let db = setup().await;
        let gauze = product(&db, "Sterile Gauze", 1000, 100, 5).await;
        let customer = db
            .customers()
            .insert(NewCustomer::new("Klinik Ankara"))
            .await
            .unwrap();

        let base = Utc::now() - chrono::Duration::days(3);
        for (offset_hours, qty) in [(0, 1), (48, 2), (24, 3)] {
            let request = SaleRequest::new(PaymentMethod::Card)
                .for_customer(&customer.id)
                .line(&gauze, qty);
            db.sales()
                .record_sale_at(&request, base + chrono::Duration::hours(offset_hours))
                .await
                .unwrap();
        }

        let history = db.sales().purchases_for(&customer.id).await.unwrap();
        let quantities: Vec<_> = history.iter().map(|s| s.items[0].quantity).collect();
        assert_eq!(quantities, [2, 3, 1]);
        assert!(history
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn test_purchase_ties_break_on_id_descending() {
        let db = setup().await;
        let gauze = product(&db, "Sterile Gauze", 1000, 100, 5).await;
        let customer = db
            .customers()
            .insert(NewCustomer::new("Eczane Deniz"))
            .await
            .unwrap();

        let at = Utc::now();
        for _ in 0..3 {
            let request = SaleRequest::new(PaymentMethod::Cash)
                .for_customer(&customer.id)
                .line(&gauze, 1);
            db.sales().record_sale_at(&request, at).await.unwrap();
        }

        let ids: Vec<_> = db
            .sales()
            .purchases_for(&customer.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(ids, sorted);
    }
}
