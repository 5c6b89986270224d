//! Stock adjustment repository.
//!
//! An adjustment is an audit row plus a product update, committed
//! together. The audit row keeps the operator's signed input verbatim;
//! the product gets the clamped arithmetic from `till_core`.

use crate::error::{DbError, DbResult};
use chrono::Utc;
use sqlx::SqlitePool;
use till_core::{apply_adjustment, StockAdjustment};
use tracing::debug;

/// Stock adjustment persistence
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an adjustment and move the product's stock accordingly,
    /// in one database transaction.
    ///
    /// [`DbError::NotFound`] when the product does not exist; nothing
    /// is written in that case.
    pub async fn apply(&self, adjustment: &StockAdjustment) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_scalar::<_, i64>(
            "SELECT stock_quantity FROM products WHERE id = ?1",
        )
        .bind(&adjustment.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", &adjustment.product_id))?;

        let new_stock = apply_adjustment(
            adjustment.adjustment_type,
            current,
            adjustment.quantity_change,
        );

        sqlx::query(
            r#"
            INSERT INTO stock_adjustments
                (id, product_id, user_id, adjustment_type, quantity_change, reason, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&adjustment.id)
        .bind(&adjustment.product_id)
        .bind(&adjustment.user_id)
        .bind(adjustment.adjustment_type)
        .bind(adjustment.quantity_change)
        .bind(&adjustment.reason)
        .bind(adjustment.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET stock_quantity = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(&adjustment.product_id)
            .bind(new_stock)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            product_id = %adjustment.product_id,
            from = current,
            to = new_stock,
            "stock adjusted"
        );
        Ok(())
    }

    /// Adjustments, optionally for one product, newest first
    pub async fn list(&self, product_id: Option<&str>) -> DbResult<Vec<StockAdjustment>> {
        let adjustments = sqlx::query_as::<_, StockAdjustment>(
            r#"
            SELECT id, product_id, user_id, adjustment_type, quantity_change, reason, created_at
            FROM stock_adjustments
            WHERE (?1 IS NULL OR product_id = ?1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(adjustments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{DateTime, Duration};
    use till_core::{AdjustmentType, Product, Role, User};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_user(db: &Database) -> String {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: format!("manager-{}", Uuid::new_v4()),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::Manager,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.users().insert(&user).await.unwrap();
        user.id
    }

    async fn seed_product(db: &Database, stock: i64) -> String {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: "Counted item".to_string(),
            description: None,
            barcode: None,
            cost_cents: 100,
            price_cents: 200,
            stock_quantity: stock,
            min_stock_level: 0,
            category: None,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product.id
    }

    fn adjustment(
        product_id: &str,
        user_id: &str,
        kind: AdjustmentType,
        change: i64,
        at: DateTime<Utc>,
    ) -> StockAdjustment {
        StockAdjustment {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            user_id: user_id.to_string(),
            adjustment_type: kind,
            quantity_change: change,
            reason: "cycle count".to_string(),
            created_at: at,
        }
    }

    async fn stock_of(db: &Database, id: &str) -> i64 {
        db.products().get_by_id(id).await.unwrap().stock_quantity
    }

    #[tokio::test]
    async fn test_increase_and_decrease() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let product_id = seed_product(&db, 100).await;

        db.stock()
            .apply(&adjustment(
                &product_id,
                &user_id,
                AdjustmentType::Increase,
                25,
                Utc::now(),
            ))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &product_id).await, 125);

        db.stock()
            .apply(&adjustment(
                &product_id,
                &user_id,
                AdjustmentType::Decrease,
                30,
                Utc::now(),
            ))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &product_id).await, 95);
    }

    #[tokio::test]
    async fn test_audit_keeps_signed_input_while_stock_uses_magnitude() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let product_id = seed_product(&db, 100).await;

        db.stock()
            .apply(&adjustment(
                &product_id,
                &user_id,
                AdjustmentType::Decrease,
                -3,
                Utc::now(),
            ))
            .await
            .unwrap();

        assert_eq!(stock_of(&db, &product_id).await, 97);
        let rows = db.stock().list(Some(&product_id)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity_change, -3);
        assert_eq!(rows[0].adjustment_type, AdjustmentType::Decrease);
    }

    #[tokio::test]
    async fn test_decrease_clamps_at_zero() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let product_id = seed_product(&db, 100).await;

        db.stock()
            .apply(&adjustment(
                &product_id,
                &user_id,
                AdjustmentType::Decrease,
                150,
                Utc::now(),
            ))
            .await
            .unwrap();

        assert_eq!(stock_of(&db, &product_id).await, 0);
        // Audit still says 150, not the 100 actually removed
        let rows = db.stock().list(Some(&product_id)).await.unwrap();
        assert_eq!(rows[0].quantity_change, 150);
    }

    #[tokio::test]
    async fn test_recount_replaces_and_clamps() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let product_id = seed_product(&db, 100).await;

        db.stock()
            .apply(&adjustment(
                &product_id,
                &user_id,
                AdjustmentType::Recount,
                42,
                Utc::now(),
            ))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &product_id).await, 42);

        db.stock()
            .apply(&adjustment(
                &product_id,
                &user_id,
                AdjustmentType::Recount,
                -5,
                Utc::now(),
            ))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &product_id).await, 0);
    }

    #[tokio::test]
    async fn test_missing_product_writes_nothing() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;

        let err = db
            .stock()
            .apply(&adjustment(
                "no-such-product",
                &user_id,
                AdjustmentType::Increase,
                5,
                Utc::now(),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(db.stock().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let first = seed_product(&db, 10).await;
        let second = seed_product(&db, 10).await;

        let base = Utc::now();
        db.stock()
            .apply(&adjustment(&first, &user_id, AdjustmentType::Increase, 1, base))
            .await
            .unwrap();
        db.stock()
            .apply(&adjustment(
                &second,
                &user_id,
                AdjustmentType::Increase,
                2,
                base + Duration::seconds(1),
            ))
            .await
            .unwrap();
        db.stock()
            .apply(&adjustment(
                &first,
                &user_id,
                AdjustmentType::Decrease,
                3,
                base + Duration::seconds(2),
            ))
            .await
            .unwrap();

        let all = db.stock().list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].quantity_change, 3); // newest first

        let only_first: Vec<i64> = db
            .stock()
            .list(Some(&first))
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.quantity_change)
            .collect();
        assert_eq!(only_first, [3, 1]);
    }
}
