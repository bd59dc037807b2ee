//! # Dashboard Handlers
//!
//! Dashboard cards and the low-stock list, computed fresh from the store on
//! every call.
//!
//! ```text
//! home()
//!   ├── preferences.show_dashboard_stats  ──► dashboard summary (today/week)
//!   └── preferences.show_low_stock_alerts ──► first N low-stock products
//!                                             (N = reporting.low_stock_preview)
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::dto::{DashboardDto, HomeDto, LowStockProductDto};
use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

pub async fn dashboard(db: &DbState, config: &ConfigState) -> Result<DashboardDto, ApiError> {
    dashboard_at(db, config, Utc::now()).await
}

/// Dashboard summary as of `now`, with "today" in the configured time zone.
pub async fn dashboard_at(
    db: &DbState,
    config: &ConfigState,
    now: DateTime<Utc>,
) -> Result<DashboardDto, ApiError> {
    let tz = config.time_zone().await?;
    let summary = db.inner().reports().dashboard_summary(now, tz).await?;
    Ok(DashboardDto::from(summary))
}

/// Low-stock products, most urgent first. `None` returns all of them.
pub async fn low_stock(
    db: &DbState,
    limit: Option<u32>,
) -> Result<Vec<LowStockProductDto>, ApiError> {
    let products = db.inner().reports().low_stock_products(limit).await?;
    Ok(products.into_iter().map(LowStockProductDto::from).collect())
}

pub async fn home(db: &DbState, config: &ConfigState) -> Result<HomeDto, ApiError> {
    home_at(db, config, Utc::now()).await
}

/// The dashboard page, honoring the Settings-page toggles.
pub async fn home_at(
    db: &DbState,
    config: &ConfigState,
    now: DateTime<Utc>,
) -> Result<HomeDto, ApiError> {
    let preferences = config.preferences().await;
    debug!(
        stats = preferences.show_dashboard_stats,
        alerts = preferences.show_low_stock_alerts,
        "Building dashboard"
    );

    let summary = if preferences.show_dashboard_stats {
        let tz = config.time_zone().await?;
        Some(db.inner().reports().dashboard_summary(now, tz).await?)
    } else {
        None
    };

    let low_stock = if preferences.show_low_stock_alerts {
        let limit = config.low_stock_preview().await;
        Some(db.inner().reports().low_stock_products(Some(limit)).await?)
    } else {
        None
    };

    Ok(HomeDto::new(&preferences, summary, low_stock))
}
