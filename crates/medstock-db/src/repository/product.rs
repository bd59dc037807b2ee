//! # Product Repository
//!
//! Catalog operations: create, look up, list, and restock products.
//!
//! ## Who Writes `quantity`
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  insert()          sets the opening stock                               │
//! │  restock(id, n)    quantity + n           (n ≥ 1)                       │
//! │  record_sale()     quantity - requested   (sale repository, guarded     │
//! │                                            by quantity >= requested)    │
//! │                                                                         │
//! │  Nothing else touches it, so quantity can never go below zero.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use medstock_core::validation::{
    validate_id, validate_name, validate_price_cents, validate_quantity, validate_stock_level,
};
use medstock_core::Product;

const PRODUCT_COLUMNS: &str = "id, name, brand, category, unit_price_cents, quantity, \
                               min_quantity, created_at, updated_at";

/// Fields supplied when adding a product to the catalog.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub min_quantity: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, unit_price_cents: i64) -> Self {
        NewProduct {
            name: name.into(),
            unit_price_cents,
            ..Default::default()
        }
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Opening stock and low-stock threshold.
    pub fn stock(mut self, quantity: i64, min_quantity: i64) -> Self {
        self.quantity = quantity;
        self.min_quantity = min_quantity;
        self
    }

    fn validate(&self) -> DbResult<()> {
        validate_name("name", &self.name)?;
        validate_price_cents(self.unit_price_cents)?;
        validate_stock_level("quantity", self.quantity)?;
        validate_stock_level("min_quantity", self.min_quantity)?;
        Ok(())
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let gauze = repo.insert(NewProduct::new("Sterile Gauze", 10000).stock(10, 5)).await?;
/// repo.restock(&gauze.id, 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Adds a product and returns it with its generated id.
    pub async fn insert(&self, new: NewProduct) -> DbResult<Product> {
        new.validate()?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: new.name.trim().to_string(),
            brand: new.brand,
            category: new.category,
            unit_price_cents: new.unit_price_cents,
            quantity: new.quantity,
            min_quantity: new.min_quantity,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, brand, category,
                unit_price_cents, quantity, min_quantity,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.unit_price_cents)
        .bind(product.quantity)
        .bind(product.min_quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists the whole catalog ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name ASC, id ASC");

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Adds `quantity` units to a product's stock and returns the new level.
    ///
    /// ## Errors
    /// - `Validation` if `quantity < 1`
    /// - `NotFound` if the product doesn't exist
    pub async fn restock(&self, id: &str, quantity: i64) -> DbResult<i64> {
        validate_id("product_id", id)?;
        validate_quantity("restock quantity", quantity)?;

        debug!(id = %id, quantity, "Restocking product");

        let new_level: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET quantity = quantity + ?2,
                updated_at = ?3
            WHERE id = ?1
            RETURNING quantity
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        new_level.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
