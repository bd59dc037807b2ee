//! # Seed Data Generator
//!
//! Populates a database with a small medical-supply catalog, a few customers
//! and a spread of sales over the last ten days, so the dashboard has
//! something to show.
//!
//! ## Usage
//! ```bash
//! # Default database and sale count
//! cargo run -p medstock-db --bin seed
//!
//! # Specify database path and number of sales
//! cargo run -p medstock-db --bin seed -- --db ./data/medstock.db --sales 60
//! ```
//!
//! Sales go through the regular sale processor, so stock and customer spend
//! stay consistent. A sale that would oversell is skipped, not forced.

use chrono::{Duration, Utc};
use std::env;
use tracing_subscriber::EnvFilter;

use medstock_core::{DashboardSummary, PaymentMethod, SaleRequest};
use medstock_db::{Database, DbConfig, NewCustomer, NewProduct, SaleError};

/// (name, brand, category, price in cents, opening stock, min stock)
const CATALOG: &[(&str, &str, &str, i64, i64, i64)] = &[
    ("Sterile Gauze 10x10", "Medipad", "Wound Care", 4500, 120, 20),
    ("Elastic Bandage 10cm", "Medipad", "Wound Care", 3250, 60, 10),
    ("Surgical Tape 2.5cm", "Hypafix", "Wound Care", 2999, 40, 10),
    ("Nitrile Gloves (M) x100", "SafeHands", "Protective", 18900, 35, 10),
    ("Nitrile Gloves (L) x100", "SafeHands", "Protective", 18900, 8, 10),
    ("FFP2 Mask x20", "AirGuard", "Protective", 24000, 25, 5),
    ("Alcohol Swabs x100", "Steriprep", "Disinfection", 5500, 80, 15),
    ("Hand Sanitizer 500ml", "Steriprep", "Disinfection", 8900, 4, 6),
    ("Syringe 5ml x100", "InjectPro", "Injection", 27500, 15, 5),
    ("Insulin Syringe x100", "InjectPro", "Injection", 32000, 3, 5),
    ("Digital Thermometer", "ThermoCare", "Diagnostics", 14900, 12, 3),
    ("Blood Pressure Monitor", "CardioLine", "Diagnostics", 129900, 6, 2),
    ("Pulse Oximeter", "CardioLine", "Diagnostics", 64900, 2, 2),
    ("Glucose Test Strips x50", "GlucoSure", "Diagnostics", 45000, 30, 8),
];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Ankara Family Clinic", "info@ankaraklinik.com.tr"),
    ("Deniz Pharmacy", "siparis@denizeczane.com"),
    ("Dr. Elif Kaya", "elif.kaya@example.com"),
    ("Home Care Istanbul", "destek@homecare.example.com"),
];

const DEFAULT_SALES: usize = 40;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,medstock=info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut sales: usize = DEFAULT_SALES;
    let mut db_path = String::from("./medstock_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales = args[i + 1].parse().unwrap_or(DEFAULT_SALES);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Medstock Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --sales <N>    Number of sales to record (default: {DEFAULT_SALES})");
                println!("  -d, --db <PATH>    Database file path (default: ./medstock_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Medstock Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut product_ids = Vec::with_capacity(CATALOG.len());
    for (name, brand, category, price, qty, min) in CATALOG {
        let product = db
            .products()
            .insert(
                NewProduct::new(*name, *price)
                    .brand(*brand)
                    .category(*category)
                    .stock(*qty, *min),
            )
            .await?;
        product_ids.push(product.id);
    }
    println!("✓ Inserted {} products", product_ids.len());

    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (name, email) in CUSTOMERS {
        let customer = db
            .customers()
            .insert(NewCustomer::new(*name).email(*email))
            .await?;
        customer_ids.push(customer.id);
    }
    println!("✓ Inserted {} customers", customer_ids.len());

    // Deterministic spread: sales every few hours going back ten days
    let now = Utc::now();
    let mut recorded = 0;
    let mut skipped = 0;

    for n in 0..sales {
        let at = now - Duration::minutes((n as i64 * 397) % (10 * 24 * 60));
        let payment = if n % 3 == 0 {
            PaymentMethod::Card
        } else {
            PaymentMethod::Cash
        };

        let mut request = SaleRequest::new(payment)
            .line(&product_ids[n % product_ids.len()], (n % 3 + 1) as i64);
        if n % 4 == 0 {
            request = request.line(&product_ids[(n * 7 + 3) % product_ids.len()], 1);
        }
        if n % 5 != 4 {
            request = request.for_customer(&customer_ids[n % customer_ids.len()]);
        }

        match db.sales().record_sale_at(&request, at).await {
            Ok(_) => recorded += 1,
            Err(SaleError::Rejected(reason)) => {
                skipped += 1;
                println!("  skipped sale #{n}: {reason}");
            }
            Err(err) => return Err(err.into()),
        }
    }
    println!("✓ Recorded {} sales ({} skipped)", recorded, skipped);

    let summary = db.reports().dashboard_summary(now, chrono_tz::UTC).await?;
    println!();
    println!("Dashboard (UTC):");
    println!("{}", serde_json::to_string_pretty(&dashboard_json(&summary))?);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// The dashboard with money as two-decimal strings, as the UI receives it.
fn dashboard_json(summary: &DashboardSummary) -> serde_json::Value {
    serde_json::json!({
        "total_products": summary.total_products,
        "low_stock_count": summary.low_stock_count,
        "today_revenue": summary.today_revenue.to_decimal_string(),
        "today_sales_count": summary.today_sales_count,
        "week_revenue": summary.week_revenue.to_decimal_string(),
        "week_sales_count": summary.week_sales_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use medstock_core::Money;

    #[test]
    fn test_dashboard_money_is_printed_as_decimal_strings() {
        let json = dashboard_json(&DashboardSummary {
            total_products: 14,
            low_stock_count: 3,
            today_revenue: Money::from_cents(50000),
            today_sales_count: 3,
            week_revenue: Money::from_cents(5),
            week_sales_count: 1,
        });

        assert_eq!(json["today_revenue"], "500.00");
        assert_eq!(json["week_revenue"], "0.05");
        assert_eq!(json["total_products"], 14);
    }
}
