//! # Report Repository
//!
//! Dashboard aggregates, computed from the sale records at query time.
//!
//! ```text
//! dashboard_summary(now, tz)
//!   ├── COUNT(*) products                       → total_products
//!   ├── COUNT(*) products WHERE qty <= min      → low_stock_count
//!   ├── Σ / COUNT sales in TODAY  [midnight, next midnight)
//!   └── Σ / COUNT sales in WEEK   [now - 7d, now)
//!
//! All four queries run in one read transaction, so a sale committed halfway
//! through is either fully counted or not counted at all.
//! ```

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use medstock_core::{DashboardSummary, Money, Product, ReportWindow, SalesTotals};

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Everything the dashboard cards show, as of `now`.
    ///
    /// `tz` decides where "today" starts and ends.
    pub async fn dashboard_summary(
        &self,
        now: DateTime<Utc>,
        tz: Tz,
    ) -> DbResult<DashboardSummary> {
        let today = ReportWindow::today(now, tz);
        let week = ReportWindow::trailing_week(now);

        let mut tx = self.pool.begin().await?;

        let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;

        let low_stock_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE quantity <= min_quantity")
                .fetch_one(&mut *tx)
                .await?;

        let today_totals = totals_in(&mut *tx, today).await?;
        let week_totals = totals_in(&mut *tx, week).await?;

        tx.commit().await?;

        let summary =
            DashboardSummary::new(total_products, low_stock_count, today_totals, week_totals);
        debug!(
            tz = tz.name(),
            total_products,
            low_stock_count,
            today_sales = summary.today_sales_count,
            week_sales = summary.week_sales_count,
            "Dashboard summary computed"
        );

        Ok(summary)
    }

    /// Products at or below their threshold, lowest stock first, then by name.
    ///
    /// `limit` takes a prefix of the same ordering; `None` returns them all.
    pub async fn low_stock_products(&self, limit: Option<u32>) -> DbResult<Vec<Product>> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map_or(-1, i64::from);

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, brand, category, unit_price_cents, quantity,
                   min_quantity, created_at, updated_at
            FROM products
            WHERE quantity <= min_quantity
            ORDER BY quantity ASC, name ASC, id ASC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Revenue and sale count for `[window.start, window.end)`.
    pub async fn totals_between(&self, window: ReportWindow) -> DbResult<SalesTotals> {
        let mut conn = self.pool.acquire().await?;
        totals_in(&mut *conn, window).await
    }

    /// Revenue and sale count over every sale ever recorded.
    pub async fn all_time_totals(&self) -> DbResult<SalesTotals> {
        let (revenue, count): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(final_amount_cents), 0), COUNT(*) FROM sales",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(SalesTotals {
            revenue: Money::from_cents(revenue),
            count,
        })
    }
}

async fn totals_in(conn: &mut SqliteConnection, window: ReportWindow) -> DbResult<SalesTotals> {
    let (revenue, count): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(final_amount_cents), 0), COUNT(*)
        FROM sales
        WHERE created_at >= ?1 AND created_at < ?2
        "#,
    )
    .bind(window.start)
    .bind(window.end)
    .fetch_one(conn)
    .await?;

    Ok(SalesTotals {
        revenue: Money::from_cents(revenue),
        count,
    })
}
