//! Dashboard windows and purchase history against recorded sales.

mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{customer, memory_db, product};
use medstock_core::{Money, PaymentMethod, SaleRequest};
use medstock_db::Database;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

async fn sell_at(db: &Database, product_id: &str, qty: i64, when: DateTime<Utc>) {
    db.sales()
        .record_sale_at(&SaleRequest::new(PaymentMethod::Cash).line(product_id, qty), when)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dashboard_today_week_and_all_time() {
    let db = memory_db().await;
    let p = product(&db, "Sterile Gauze", "50.00", 100, 5).await;
    let now = at(2026, 10, 18, 15);

    // 100.00 + 150.00 + 250.00 today, 80.00 ten days ago
    sell_at(&db, &p, 2, at(2026, 10, 18, 9)).await;
    sell_at(&db, &p, 3, at(2026, 10, 18, 10)).await;
    sell_at(&db, &p, 5, at(2026, 10, 18, 11)).await;
    let old = product(&db, "Elastic Bandage", "80.00", 10, 2).await;
    sell_at(&db, &old, 1, now - Duration::days(10)).await;

    let summary = db
        .reports()
        .dashboard_summary(now, chrono_tz::UTC)
        .await
        .unwrap();

    assert_eq!(summary.today_revenue.to_string(), "500.00");
    assert_eq!(summary.today_sales_count, 3);
    assert_eq!(summary.week_revenue.to_string(), "500.00");
    assert_eq!(summary.week_sales_count, 3);
    assert_eq!(summary.total_products, 2);
    assert_eq!(summary.low_stock_count, 0);

    let all = db.reports().all_time_totals().await.unwrap();
    assert_eq!(all.revenue, Money::parse("580.00").unwrap());
    assert_eq!(all.count, 4);
}

#[tokio::test]
async fn test_week_is_trailing_seven_days() {
    let db = memory_db().await;
    let p = product(&db, "Sterile Gauze", "10.00", 100, 5).await;
    let now = at(2026, 10, 18, 15);

    // Exactly seven days back is inside; a second earlier is not
    sell_at(&db, &p, 1, now - Duration::days(7)).await;
    sell_at(&db, &p, 1, now - Duration::days(7) - Duration::seconds(1)).await;
    // Sales stamped at or after `now` are outside the window
    sell_at(&db, &p, 1, now).await;

    let summary = db
        .reports()
        .dashboard_summary(now, chrono_tz::UTC)
        .await
        .unwrap();

    assert_eq!(summary.week_sales_count, 1);
    assert_eq!(summary.week_revenue.to_string(), "10.00");
}

#[tokio::test]
async fn test_today_uses_configured_time_zone() {
    let db = memory_db().await;
    let p = product(&db, "Sterile Gauze", "10.00", 100, 5).await;
    let now = at(2026, 10, 18, 15);

    // 01:00 UTC on the 18th is still the 17th in New York
    sell_at(&db, &p, 1, at(2026, 10, 18, 1)).await;
    sell_at(&db, &p, 1, at(2026, 10, 18, 12)).await;

    let utc = db
        .reports()
        .dashboard_summary(now, chrono_tz::UTC)
        .await
        .unwrap();
    let new_york = db
        .reports()
        .dashboard_summary(now, chrono_tz::America::New_York)
        .await
        .unwrap();

    assert_eq!(utc.today_sales_count, 2);
    assert_eq!(new_york.today_sales_count, 1);
    assert_eq!(new_york.week_sales_count, 2);
}

#[tokio::test]
async fn test_purchase_history_lines_and_order() {
    let db = memory_db().await;
    let gauze = product(&db, "Sterile Gauze", "45.00", 100, 5).await;
    let tape = product(&db, "Surgical Tape", "29.99", 100, 5).await;
    let c = customer(&db, "Ankara Family Clinic").await;
    let other = customer(&db, "Deniz Pharmacy").await;

    let first = SaleRequest::new(PaymentMethod::Cash)
        .for_customer(&c)
        .line(&gauze, 2);
    let second = SaleRequest::new(PaymentMethod::Card)
        .for_customer(&c)
        .line(&tape, 1)
        .line(&gauze, 1);
    let unrelated = SaleRequest::new(PaymentMethod::Cash)
        .for_customer(&other)
        .line(&tape, 1);

    db.sales().record_sale_at(&first, at(2026, 10, 10, 9)).await.unwrap();
    db.sales().record_sale_at(&second, at(2026, 10, 12, 9)).await.unwrap();
    db.sales().record_sale_at(&unrelated, at(2026, 10, 11, 9)).await.unwrap();

    let history = db.sales().purchases_for(&c).await.unwrap();
    assert_eq!(history.len(), 2);

    let newest = &history[0];
    assert_eq!(newest.payment_method, PaymentMethod::Card);
    assert_eq!(newest.final_amount().to_string(), "74.99");
    let names: Vec<_> = newest.items.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Surgical Tape", "Sterile Gauze"]);

    assert_eq!(history[1].final_amount().to_string(), "90.00");
    assert_eq!(history[1].created_at, at(2026, 10, 10, 9));
}

#[tokio::test]
async fn test_history_keeps_prices_from_time_of_sale() {
    let db = memory_db().await;
    let gauze = product(&db, "Sterile Gauze", "45.00", 100, 5).await;
    let c = customer(&db, "Ankara Family Clinic").await;

    db.sales()
        .record_sale(
            &SaleRequest::new(PaymentMethod::Cash)
                .for_customer(&c)
                .line(&gauze, 1),
        )
        .await
        .unwrap();

    // Catalog edit after the sale
    sqlx::query("UPDATE products SET name = 'Gauze (new)', unit_price_cents = 9900 WHERE id = ?1")
        .bind(&gauze)
        .execute(db.pool())
        .await
        .unwrap();

    let history = db.sales().purchases_for(&c).await.unwrap();
    assert_eq!(history[0].items[0].name, "Sterile Gauze");
    assert_eq!(history[0].items[0].unit_price().to_string(), "45.00");
}

#[tokio::test]
async fn test_history_for_unknown_or_idle_customer_is_empty() {
    let db = memory_db().await;
    let c = customer(&db, "New Customer").await;

    assert!(db.sales().purchases_for(&c).await.unwrap().is_empty());
    assert!(db.sales().purchases_for("nobody").await.unwrap().is_empty());
}
