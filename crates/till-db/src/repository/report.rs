//! Reporting repository: sales summary and profit & loss.
//!
//! Reports only ever see `completed` transactions. Profit math joins
//! items against the product's current cost price; the sales report
//! subtracts cost from transaction totals (tax and discount included),
//! while profit & loss works purely off line totals. That asymmetry
//! is long-standing till behavior and is kept on purpose.

use crate::error::DbResult;
use serde::Serialize;
use sqlx::SqlitePool;
use till_core::{DateRange, PaymentMethod};
use tracing::debug;

/// Sales summary over a period
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub total_sales_cents: i64,
    pub total_transactions: i64,
    pub average_sale_cents: i64,
    pub total_profit_cents: i64,
    pub top_products: Vec<TopProduct>,
    pub payment_methods: Vec<PaymentMethodSummary>,
}

/// One of the best-selling products of a period
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub quantity_sold: i64,
    pub total_cents: i64,
}

/// Takings broken down by payment method
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentMethodSummary {
    pub payment_method: PaymentMethod,
    pub transaction_count: i64,
    pub total_cents: i64,
}

/// Profit & loss over a period
#[derive(Debug, Clone, Serialize)]
pub struct ProfitLossReport {
    pub revenue_cents: i64,
    pub cogs_cents: i64,
    pub gross_profit_cents: i64,
    pub margin_pct: f64,
    pub transaction_count: i64,
}

/// Report aggregation
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Sales summary for the range: total and average takings,
    /// profit, top five products by units sold, per-method breakdown.
    pub async fn sales_report(&self, range: DateRange) -> DbResult<SalesReport> {
        debug!(?range, "building sales report");

        let (total_transactions, total_sales_cents) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_cents), 0)
            FROM transactions
            WHERE status = 'completed'
              AND (?1 IS NULL OR created_at >= ?1)
              AND (?2 IS NULL OR created_at <= ?2)
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await?;

        let cogs_cents = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(ti.quantity * p.cost_cents), 0)
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            JOIN products p ON p.id = ti.product_id
            WHERE t.status = 'completed'
              AND (?1 IS NULL OR t.created_at >= ?1)
              AND (?2 IS NULL OR t.created_at <= ?2)
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await?;

        let top_products = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT ti.product_id, p.name AS name,
                   SUM(ti.quantity) AS quantity_sold,
                   SUM(ti.line_total_cents) AS total_cents
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            JOIN products p ON p.id = ti.product_id
            WHERE t.status = 'completed'
              AND (?1 IS NULL OR t.created_at >= ?1)
              AND (?2 IS NULL OR t.created_at <= ?2)
            GROUP BY ti.product_id, p.name
            ORDER BY quantity_sold DESC, p.name ASC
            LIMIT 5
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        let payment_methods = sqlx::query_as::<_, PaymentMethodSummary>(
            r#"
            SELECT payment_method,
                   COUNT(*) AS transaction_count,
                   COALESCE(SUM(total_cents), 0) AS total_cents
            FROM transactions
            WHERE status = 'completed'
              AND (?1 IS NULL OR created_at >= ?1)
              AND (?2 IS NULL OR created_at <= ?2)
            GROUP BY payment_method
            ORDER BY payment_method
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        let average_sale_cents = if total_transactions > 0 {
            total_sales_cents / total_transactions
        } else {
            0
        };

        Ok(SalesReport {
            total_sales_cents,
            total_transactions,
            average_sale_cents,
            total_profit_cents: total_sales_cents - cogs_cents,
            top_products,
            payment_methods,
        })
    }

    /// Profit & loss for the range, entirely item-based: a completed
    /// transaction with no items contributes nothing here.
    pub async fn profit_loss(&self, range: DateRange) -> DbResult<ProfitLossReport> {
        debug!(?range, "building profit and loss report");

        let (revenue_cents, cogs_cents, transaction_count) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT COALESCE(SUM(ti.line_total_cents), 0),
                   COALESCE(SUM(ti.quantity * p.cost_cents), 0),
                   COUNT(DISTINCT t.id)
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            JOIN products p ON p.id = ti.product_id
            WHERE t.status = 'completed'
              AND (?1 IS NULL OR t.created_at >= ?1)
              AND (?2 IS NULL OR t.created_at <= ?2)
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await?;

        let gross_profit_cents = revenue_cents - cogs_cents;
        let margin_pct = if revenue_cents > 0 {
            gross_profit_cents as f64 / revenue_cents as f64 * 100.0
        } else {
            0.0
        };

        Ok(ProfitLossReport {
            revenue_cents,
            cogs_cents,
            gross_profit_cents,
            margin_pct,
            transaction_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{DateTime, NaiveDate, Utc};
    use till_core::{Product, Role, Transaction, TransactionItem, TransactionStatus, User};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2026, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn january() -> DateRange {
        DateRange::from_dates(
            Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
            Some(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()),
        )
    }

    async fn seed_user(db: &Database) -> String {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: format!("u-{}", Uuid::new_v4()),
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

    async fn seed_product(db: &Database, name: &str, cost: i64, price: i64) -> String {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            barcode: None,
            cost_cents: cost,
            price_cents: price,
            stock_quantity: 1000,
            min_stock_level: 0,
            category: None,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product.id
    }

    /// Insert a sale dated `when` with the given (product, qty, price)
    /// lines; total is the plain line sum, no tax or discount.
    async fn seed_sale(
        db: &Database,
        user_id: &str,
        when: DateTime<Utc>,
        status: TransactionStatus,
        method: PaymentMethod,
        lines: &[(&str, i64, i64)],
    ) {
        let id = Uuid::new_v4().to_string();
        let total: i64 = lines.iter().map(|(_, qty, price)| qty * price).sum();
        let txn = Transaction {
            id: id.clone(),
            user_id: user_id.to_string(),
            receipt_number: format!("RCP-{}", Uuid::new_v4()),
            status,
            total_cents: total,
            tax_cents: 0,
            discount_cents: 0,
            payment_method: method,
            created_at: when,
            updated_at: when,
        };
        let items: Vec<TransactionItem> = lines
            .iter()
            .map(|(product_id, quantity, unit_price)| TransactionItem {
                id: Uuid::new_v4().to_string(),
                transaction_id: id.clone(),
                product_id: product_id.to_string(),
                quantity: *quantity,
                unit_price_cents: *unit_price,
                line_total_cents: quantity * unit_price,
                created_at: when,
            })
            .collect();
        db.sales().create(&txn, &items).await.unwrap();
    }

    #[tokio::test]
    async fn test_sales_report_aggregates_completed_only() {
        let db = test_db().await;
        let user = seed_user(&db).await;
        let cola = seed_product(&db, "Cola", 200, 500).await;
        let bread = seed_product(&db, "Bread", 100, 300).await;

        // In range, completed: 2 Cola + 1 Bread = 1300; 3 Bread = 900
        seed_sale(
            &db,
            &user,
            at(10, 9),
            TransactionStatus::Completed,
            PaymentMethod::Cash,
            &[(&cola, 2, 500), (&bread, 1, 300)],
        )
        .await;
        seed_sale(
            &db,
            &user,
            at(12, 14),
            TransactionStatus::Completed,
            PaymentMethod::Card,
            &[(&bread, 3, 300)],
        )
        .await;
        // Pending: invisible to reports
        seed_sale(
            &db,
            &user,
            at(13, 10),
            TransactionStatus::Pending,
            PaymentMethod::Cash,
            &[(&cola, 5, 500)],
        )
        .await;
        // Completed but outside the range: invisible
        seed_sale(
            &db,
            &user,
            at(10, 9) - chrono::Duration::days(60),
            TransactionStatus::Completed,
            PaymentMethod::Cash,
            &[(&cola, 9, 500)],
        )
        .await;

        let report = db.reports().sales_report(january()).await.unwrap();

        assert_eq!(report.total_sales_cents, 2200);
        assert_eq!(report.total_transactions, 2);
        assert_eq!(report.average_sale_cents, 1100);
        // Cost: 2*200 + 1*100 + 3*100 = 800
        assert_eq!(report.total_profit_cents, 1400);

        // Bread sold 4 units, Cola 2: Bread leads
        assert_eq!(report.top_products.len(), 2);
        assert_eq!(report.top_products[0].name, "Bread");
        assert_eq!(report.top_products[0].quantity_sold, 4);
        assert_eq!(report.top_products[0].total_cents, 1200);
        assert_eq!(report.top_products[1].name, "Cola");

        let methods: Vec<(PaymentMethod, i64, i64)> = report
            .payment_methods
            .iter()
            .map(|m| (m.payment_method, m.transaction_count, m.total_cents))
            .collect();
        assert_eq!(
            methods,
            [
                (PaymentMethod::Card, 1, 900),
                (PaymentMethod::Cash, 1, 1300),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_period_is_all_zeros() {
        let db = test_db().await;

        let report = db.reports().sales_report(january()).await.unwrap();
        assert_eq!(report.total_sales_cents, 0);
        assert_eq!(report.total_transactions, 0);
        assert_eq!(report.average_sale_cents, 0);
        assert_eq!(report.total_profit_cents, 0);
        assert!(report.top_products.is_empty());
        assert!(report.payment_methods.is_empty());

        let pnl = db.reports().profit_loss(january()).await.unwrap();
        assert_eq!(pnl.revenue_cents, 0);
        assert_eq!(pnl.gross_profit_cents, 0);
        assert_eq!(pnl.margin_pct, 0.0);
        assert_eq!(pnl.transaction_count, 0);
    }

    #[tokio::test]
    async fn test_top_product_ties_break_by_name() {
        let db = test_db().await;
        let user = seed_user(&db).await;
        let zebra = seed_product(&db, "Zebra bars", 100, 200).await;
        let apple = seed_product(&db, "Apple rings", 100, 200).await;

        seed_sale(
            &db,
            &user,
            at(5, 10),
            TransactionStatus::Completed,
            PaymentMethod::Cash,
            &[(&zebra, 3, 200), (&apple, 3, 200)],
        )
        .await;

        let report = db.reports().sales_report(january()).await.unwrap();
        assert_eq!(report.top_products[0].name, "Apple rings");
        assert_eq!(report.top_products[1].name, "Zebra bars");
    }

    #[tokio::test]
    async fn test_profit_loss_math() {
        let db = test_db().await;
        let user = seed_user(&db).await;
        let cola = seed_product(&db, "Cola", 200, 500).await;
        let bread = seed_product(&db, "Bread", 100, 300).await;

        seed_sale(
            &db,
            &user,
            at(10, 9),
            TransactionStatus::Completed,
            PaymentMethod::Cash,
            &[(&cola, 2, 500), (&bread, 1, 300)],
        )
        .await;
        seed_sale(
            &db,
            &user,
            at(12, 14),
            TransactionStatus::Completed,
            PaymentMethod::Card,
            &[(&bread, 3, 300)],
        )
        .await;

        let pnl = db.reports().profit_loss(january()).await.unwrap();
        assert_eq!(pnl.revenue_cents, 2200);
        assert_eq!(pnl.cogs_cents, 800);
        assert_eq!(pnl.gross_profit_cents, 1400);
        assert!((pnl.margin_pct - 63.636363).abs() < 0.001);
        assert_eq!(pnl.transaction_count, 2);
    }

    #[tokio::test]
    async fn test_itemless_transaction_counts_only_in_sales_report() {
        let db = test_db().await;
        let user = seed_user(&db).await;

        // Completed, dated in range, zero items
        seed_sale(
            &db,
            &user,
            at(8, 12),
            TransactionStatus::Completed,
            PaymentMethod::Cash,
            &[],
        )
        .await;

        let report = db.reports().sales_report(january()).await.unwrap();
        assert_eq!(report.total_transactions, 1);

        let pnl = db.reports().profit_loss(january()).await.unwrap();
        assert_eq!(pnl.transaction_count, 0);
    }

    #[tokio::test]
    async fn test_end_of_day_extension_includes_evening_sales() {
        let db = test_db().await;
        let user = seed_user(&db).await;
        let cola = seed_product(&db, "Cola", 200, 500).await;

        // 18:00 on the report's end date
        seed_sale(
            &db,
            &user,
            at(31, 18),
            TransactionStatus::Completed,
            PaymentMethod::Cash,
            &[(&cola, 1, 500)],
        )
        .await;

        let report = db.reports().sales_report(january()).await.unwrap();
        assert_eq!(report.total_transactions, 1);
        assert_eq!(report.total_sales_cents, 500);
    }
}
