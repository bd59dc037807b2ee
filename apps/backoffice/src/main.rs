//! # Back-Office Report Tool
//!
//! Command-line front for the back-office handlers. Prints JSON on stdout
//! (the same payloads the UI receives) and logs on stderr.
//!
//! ## Usage
//! ```bash
//! # Dashboard page (summary + low-stock preview, per preferences)
//! cargo run -p medstock-backoffice
//!
//! # Full low-stock list, or the first 10
//! cargo run -p medstock-backoffice -- low-stock
//! cargo run -p medstock-backoffice -- low-stock 10
//!
//! # A customer's purchase history
//! cargo run -p medstock-backoffice -- history <customer-id>
//!
//! # Alternate config file
//! cargo run -p medstock-backoffice -- --config ./dev.toml customers
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use serde::Serialize;
use tracing::info;

use medstock_backoffice::{handlers, init_tracing, ApiError, AppConfig, ConfigState, DbState};

const USAGE: &str = "\
Usage: medstock-backoffice [--config <PATH>] [COMMAND]

Commands:
  dashboard               Dashboard page (default)
  low-stock [LIMIT]       Products at or below their minimum stock
  customers               Customers with their total spend
  history <CUSTOMER_ID>   A customer's purchases, newest first
  sale <SALE_ID>          One sale with its lines";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut config_path: Option<PathBuf> = None;
    if let Some(i) = args.iter().position(|a| a == "--config" || a == "-c") {
        if i + 1 >= args.len() {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
        config_path = Some(PathBuf::from(args.remove(i + 1)));
        args.remove(i);
    }

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(config_path, &args).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            match serde_json::to_string_pretty(&err) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{err}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config_path: Option<PathBuf>, args: &[String]) -> Result<String, ApiError> {
    let app_config = AppConfig::load(config_path.clone())?;
    let db = DbState::open(&app_config).await?;
    info!(
        time_zone = %app_config.reporting.time_zone,
        "Back office ready"
    );
    let config = ConfigState::new(app_config, config_path);

    // Close the pool on every outcome before reporting it
    let result = dispatch(&db, &config, args).await;
    db.inner().close().await;
    result
}

async fn dispatch(db: &DbState, config: &ConfigState, args: &[String]) -> Result<String, ApiError> {
    let command = args.first().map(String::as_str).unwrap_or("dashboard");
    match command {
        "dashboard" => to_json(&handlers::home(db, config).await?),
        "low-stock" => {
            let limit = match args.get(1) {
                Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                    ApiError::validation(format!("LIMIT must be a positive number, got '{raw}'"))
                })?),
                None => None,
            };
            to_json(&handlers::low_stock(db, limit).await?)
        }
        "customers" => to_json(&handlers::list_customers(db).await?),
        "history" => {
            let customer_id = required(args, "CUSTOMER_ID")?;
            to_json(&handlers::customer_purchases(db, customer_id).await?)
        }
        "sale" => {
            let sale_id = required(args, "SALE_ID")?;
            to_json(&handlers::get_sale(db, sale_id).await?)
        }
        other => Err(ApiError::validation(format!(
            "Unknown command '{other}'\n\n{USAGE}"
        ))),
    }
}

fn required<'a>(args: &'a [String], name: &str) -> Result<&'a str, ApiError> {
    args.get(1)
        .map(String::as_str)
        .ok_or_else(|| ApiError::validation(format!("Missing {name}\n\n{USAGE}")))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medstock_backoffice::ErrorCode;

    #[tokio::test]
    async fn test_failed_command_still_closes_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let db_path = dir.path().join("shop.db");
        std::fs::write(
            &config_path,
            format!("[database]\npath = \"{}\"\n", db_path.display()),
        )
        .unwrap();

        let args = vec!["sale".to_string(), "no-such-sale".to_string()];
        let err = run(Some(config_path.clone()), &args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        // The last connection to close checkpoints and removes the WAL file
        assert!(db_path.exists());
        assert!(!dir.path().join("shop.db-wal").exists());

        let args = vec!["bogus".to_string()];
        let err = run(Some(config_path), &args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!dir.path().join("shop.db-wal").exists());
    }
}
