//! Product catalogue repository.

use crate::error::{DbError, DbResult};
use sqlx::SqlitePool;
use till_core::Product;
use tracing::debug;

const PRODUCT_COLUMNS: &str = "id, name, description, barcode, cost_cents, price_cents, \
                               stock_quantity, min_stock_level, category, created_at, updated_at";

/// Product persistence
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new product.
    ///
    /// A duplicate barcode surfaces as [`DbError::UniqueViolation`];
    /// products without a barcode never collide.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(name = %product.name, "inserting product");

        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, barcode, cost_cents, price_cents,
                 stock_quantity, min_stock_level, category, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.barcode)
        .bind(product.cost_cents)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(product.min_stock_level)
        .bind(&product.category)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch a product by id, erroring when absent
    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Exact barcode lookup. `None` for no match, including the empty
    /// string (stored barcodes are never empty).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// All products, name order
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Write every mutable column of an already-merged product row
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(product_id = %product.id, "updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, description = ?3, barcode = ?4, cost_cents = ?5,
                price_cents = ?6, stock_quantity = ?7, min_stock_level = ?8,
                category = ?9, updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.barcode)
        .bind(product.cost_cents)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(product.min_stock_level)
        .bind(&product.category)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Products at or below their reorder threshold, name order.
    ///
    /// Plain `stock <= threshold`, so a threshold of zero flags a
    /// product only once its shelf is empty.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE stock_quantity <= min_stock_level
            ORDER BY name
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Number of products in the catalogue
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
