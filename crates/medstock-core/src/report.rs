//! # Reporting Windows
//!
//! Time windows and result types for the dashboard.
//!
//! ## Window Conventions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  All windows are half-open: [start, end)                                │
//! │                                                                         │
//! │  TODAY  = [local midnight of now's day, next local midnight)            │
//! │           "local" = the store's configured time zone                    │
//! │                                                                         │
//! │           00:00                 now                  24:00              │
//! │             ├────────────────────┼─────────────────────┤                │
//! │             └──────────────── today ───────────────────┘                │
//! │                                                                         │
//! │  WEEK   = [now - 7 × 24h, now)       trailing, NOT calendar week        │
//! │                                                                         │
//! │      now-7d                                          now                │
//! │        ├──────────────────────────────────────────────┤                 │
//! │        └────────────────────── week ──────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `now` is always an argument. Nothing in this module reads the clock.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Length of the trailing "week" window, in days.
pub const WEEK_WINDOW_DAYS: i64 = 7;

/// Default number of low-stock products shown on the dashboard.
pub const DEFAULT_LOW_STOCK_PREVIEW: u32 = 5;

// =============================================================================
// Report Window
// =============================================================================

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        ReportWindow { start, end }
    }

    /// `start <= ts < end`.
    #[inline]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }

    /// The calendar day containing `now`, in `tz`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use medstock_core::report::ReportWindow;
    ///
    /// // 21:30 UTC is already the next day in Istanbul (UTC+3)
    /// let now = Utc.with_ymd_and_hms(2026, 3, 10, 21, 30, 0).unwrap();
    /// let today = ReportWindow::today(now, chrono_tz::Europe::Istanbul);
    ///
    /// assert_eq!(today.start, Utc.with_ymd_and_hms(2026, 3, 10, 21, 0, 0).unwrap());
    /// assert_eq!(today.end, Utc.with_ymd_and_hms(2026, 3, 11, 21, 0, 0).unwrap());
    /// ```
    pub fn today(now: DateTime<Utc>, tz: Tz) -> Self {
        let local_date = now.with_timezone(&tz).date_naive();
        let start = local_midnight(tz, local_date);
        let end = local_date
            .succ_opt()
            .map(|next| local_midnight(tz, next))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        ReportWindow { start, end }
    }

    /// The trailing [`WEEK_WINDOW_DAYS`] ending at `now` (exclusive).
    pub fn trailing_week(now: DateTime<Utc>) -> Self {
        ReportWindow {
            start: now - Duration::days(WEEK_WINDOW_DAYS),
            end: now,
        }
    }
}

/// First instant of `date` in `tz`, as UTC.
///
/// A DST transition can skip local midnight entirely; the day then begins at
/// the first local time that exists.
fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);

    (0..=2)
        .find_map(|hours| {
            tz.from_local_datetime(&(midnight + Duration::hours(hours)))
                .earliest()
        })
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

// =============================================================================
// Results
// =============================================================================

/// Revenue and sale count over some window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesTotals {
    pub revenue: Money,
    pub count: i64,
}

/// Everything the dashboard cards show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub total_products: i64,
    pub low_stock_count: i64,
    pub today_revenue: Money,
    pub today_sales_count: i64,
    pub week_revenue: Money,
    pub week_sales_count: i64,
}

impl DashboardSummary {
    /// Assembles a summary from catalog counts and the two windowed totals.
    pub fn new(
        total_products: i64,
        low_stock_count: i64,
        today: SalesTotals,
        week: SalesTotals,
    ) -> Self {
        DashboardSummary {
            total_products,
            low_stock_count,
            today_revenue: today.revenue,
            today_sales_count: today.count,
            week_revenue: week.revenue,
            week_sales_count: week.count,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
