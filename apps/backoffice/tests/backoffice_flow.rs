//! The back office driven end to end from a config file on disk.

use medstock_backoffice::dto::{RecordSaleInput, SaleLineInput};
use medstock_backoffice::{handlers, AppConfig, ConfigState, DbState, ErrorCode};
use medstock_db::{NewCustomer, NewProduct};

fn sale(customer_id: Option<&str>, lines: &[(&str, i64)], payment: &str) -> RecordSaleInput {
    RecordSaleInput {
        customer_id: customer_id.map(str::to_string),
        items: lines
            .iter()
            .map(|(product_id, quantity)| SaleLineInput {
                product_id: product_id.to_string(),
                quantity: *quantity,
            })
            .collect(),
        payment_method: payment.to_string(),
    }
}

#[tokio::test]
async fn test_config_file_to_dashboard() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    let db_path = dir.path().join("shop.db");
    std::fs::write(
        &config_path,
        format!(
            r#"
            [database]
            path = "{}"

            [reporting]
            time_zone = "Europe/Istanbul"
            low_stock_preview = 2
            "#,
            db_path.display()
        ),
    )
    .unwrap();

    let app_config = AppConfig::load(Some(config_path.clone())).unwrap();
    let db = DbState::open(&app_config).await.unwrap();
    let config = ConfigState::new(app_config, Some(config_path));
    assert!(db_path.exists());

    let products = db.inner().products();
    let gauze = products
        .insert(NewProduct::new("Sterile Gauze", 10000).stock(10, 5))
        .await
        .unwrap()
        .id;
    let gloves = products
        .insert(NewProduct::new("Nitrile Gloves (M)", 18900).stock(1, 5))
        .await
        .unwrap()
        .id;
    let clinic = db
        .inner()
        .customers()
        .insert(NewCustomer::new("Ankara Family Clinic"))
        .await
        .unwrap()
        .id;

    // 3 × 100.00 cash for the clinic
    let first = handlers::record_sale(&db, sale(Some(&clinic), &[(gauze.as_str(), 3)], "cash"))
        .await
        .unwrap();
    assert_eq!(first.final_amount, "300.00");

    // Gloves cannot be covered, so nothing in this sale is taken
    let err = handlers::record_sale(
        &db,
        sale(Some(&clinic), &[(gauze.as_str(), 2), (gloves.as_str(), 3)], "card"),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert_eq!(err.shortfalls.len(), 1);
    assert!(!err.is_retryable());

    // Two walk-in sales take gauze down to its minimum
    for _ in 0..2 {
        handlers::record_sale(&db, sale(None, &[(gauze.as_str(), 2)], "card"))
            .await
            .unwrap();
    }

    let page = handlers::home(&db, &config).await.unwrap();
    let summary = page.summary.unwrap();
    assert_eq!(summary.total_products, 2);
    assert_eq!(summary.low_stock_count, 2);

    let low_stock = page.low_stock.unwrap();
    let names: Vec<_> = low_stock.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Nitrile Gloves (M)", "Sterile Gauze"]);
    assert_eq!(low_stock[1].quantity, 3);

    let history = handlers::customer_purchases(&db, &clinic).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, first.id);

    let customers = handlers::list_customers(&db).await.unwrap();
    assert_eq!(customers[0].total_spent, "300.00");

    let json = serde_json::to_value(&history[0]).unwrap();
    assert_eq!(json["items"][0]["total"], "300.00");
    assert_eq!(json["payment_method"], "cash");

    db.inner().close().await;
}
