//! Sale repository: atomic sale writes, receipts, transaction history.
//!
//! A sale is one database transaction covering the `transactions` row,
//! every `transaction_items` row, and every stock decrement. If any
//! step refuses (unknown product, not enough stock, constraint hit),
//! the whole sale vanishes; there is no partial state to clean up.

use crate::error::{DbError, DbResult};
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use till_core::{DateRange, Transaction, TransactionItem};
use tracing::debug;

const TRANSACTION_COLUMNS: &str = "id, user_id, receipt_number, status, total_cents, tax_cents, \
                                   discount_cents, payment_method, created_at, updated_at";

/// One line of a printable receipt: a transaction item joined with its
/// product name
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReceiptLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// Sales persistence
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a sale: the transaction row, its items, and the stock
    /// decrements, all or nothing.
    ///
    /// Stock is taken with a guarded column-relative update, so a
    /// concurrent sale can never drive a product negative. When the
    /// guard refuses, the probe distinguishes a missing product
    /// ([`DbError::NotFound`]) from an oversell
    /// ([`DbError::InsufficientStock`]).
    pub async fn create(&self, transaction: &Transaction, items: &[TransactionItem]) -> DbResult<()> {
        debug!(
            transaction_id = %transaction.id,
            receipt = %transaction.receipt_number,
            items = items.len(),
            "creating sale"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, user_id, receipt_number, status, total_cents, tax_cents,
                 discount_cents, payment_method, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.user_id)
        .bind(&transaction.receipt_number)
        .bind(transaction.status)
        .bind(transaction.total_cents)
        .bind(transaction.tax_cents)
        .bind(transaction.discount_cents)
        .bind(transaction.payment_method)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            let taken = sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - ?2, updated_at = ?3
                WHERE id = ?1 AND stock_quantity >= ?2
                "#,
            )
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

            if taken.rows_affected() == 0 {
                // Guard refused: find out why while still inside the
                // transaction, then bail and roll everything back
                let probe = sqlx::query_as::<_, (String, i64)>(
                    "SELECT name, stock_quantity FROM products WHERE id = ?1",
                )
                .bind(&item.product_id)
                .fetch_optional(&mut *tx)
                .await?;

                return match probe {
                    None => Err(DbError::not_found("Product", &item.product_id)),
                    Some((name, available)) => Err(DbError::InsufficientStock {
                        product: name,
                        available,
                        requested: item.quantity,
                    }),
                };
            }

            sqlx::query(
                r#"
                INSERT INTO transaction_items
                    (id, transaction_id, product_id, quantity, unit_price_cents,
                     line_total_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.transaction_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Fetch a transaction by id, erroring when absent
    pub async fn get_by_id(&self, id: &str) -> DbResult<Transaction> {
        sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Transaction", id))
    }

    /// Transactions inside the range, newest first
    pub async fn list(&self, range: DateRange) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE (?1 IS NULL OR created_at >= ?1)
              AND (?2 IS NULL OR created_at <= ?2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Receipt lines for a transaction: items joined with product
    /// names, in the order the items were rung up. Empty when the
    /// transaction has no items.
    pub async fn receipt_lines(&self, transaction_id: &str) -> DbResult<Vec<ReceiptLine>> {
        let lines = sqlx::query_as::<_, ReceiptLine>(
            r#"
            SELECT ti.product_id, p.name AS product_name, ti.quantity,
                   ti.unit_price_cents, ti.line_total_cents
            FROM transaction_items ti
            JOIN products p ON p.id = ti.product_id
            WHERE ti.transaction_id = ?1
            ORDER BY ti.rowid
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Items of a transaction, in rung-up order
    pub async fn items(&self, transaction_id: &str) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT id, transaction_id, product_id, quantity, unit_price_cents,
                   line_total_cents, created_at
            FROM transaction_items
            WHERE transaction_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
