//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use medstock_core::Money;
use medstock_db::{Database, DbConfig, NewCustomer, NewProduct};

pub async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// Inserts a product; price is given as a decimal string ("100.00").
pub async fn product(db: &Database, name: &str, price: &str, qty: i64, min: i64) -> String {
    let cents = Money::parse(price).unwrap().cents();
    db.products()
        .insert(NewProduct::new(name, cents).stock(qty, min))
        .await
        .unwrap()
        .id
}

pub async fn customer(db: &Database, name: &str) -> String {
    db.customers()
        .insert(NewCustomer::new(name))
        .await
        .unwrap()
        .id
}

pub async fn quantity(db: &Database, product_id: &str) -> i64 {
    db.products()
        .get_by_id(product_id)
        .await
        .unwrap()
        .unwrap()
        .quantity
}

pub async fn total_spent(db: &Database, customer_id: &str) -> Money {
    db.customers()
        .get_by_id(customer_id)
        .await
        .unwrap()
        .unwrap()
        .total_spent()
}

/// Σ final_amount over the customer's recorded sales.
pub async fn sum_of_purchases(db: &Database, customer_id: &str) -> Money {
    db.sales()
        .purchases_for(customer_id)
        .await
        .unwrap()
        .iter()
        .map(|sale| sale.final_amount())
        .sum()
}
