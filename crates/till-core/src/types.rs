//! Core entity types shared across Till POS.
//!
//! These structs mirror the database schema one-to-one. Monetary
//! columns are integer cents, tax rates are basis points, and all
//! timestamps are UTC. Enums serialize to snake_case strings both on
//! the wire and in the database (via the optional `sqlx` feature).

use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Tax Rate
// ============================================================================

/// A tax rate in basis points (1 bp = 0.01%).
///
/// 1500 basis points = 15.00%. Stored as `u32`, so rates are always
/// non-negative; validation caps them at 100% (10_000 bps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// No tax
    pub const ZERO: TaxRate = TaxRate(0);

    /// Create from basis points
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// The raw basis-point value
    pub const fn bps(self) -> u32 {
        self.0
    }

    /// Tax owed on `amount` at this rate, rounded half up to the cent
    pub fn tax_on(self, amount: Money) -> Money {
        amount.tax_at_bps(self.0)
    }
}

// ============================================================================
// Users
// ============================================================================

/// User role within the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Cashier,
    Manager,
}

/// A staff account.
///
/// Deliberately `Serialize`-only: the password hash must never leave
/// the server, and a `Deserialize` impl would conflict with the
/// `skip_serializing` attribute anyway. Inputs arrive through RPC
/// request types, never through this struct.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Products
// ============================================================================

/// A sellable product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub cost_cents: i64,
    pub price_cents: i64,
    pub stock_quantity: i64,
    pub min_stock_level: i64,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Selling price as [`Money`]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Cost price as [`Money`]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// True when stock has fallen to or below the reorder threshold.
    ///
    /// The comparison is plain `stock <= threshold`, so a product with
    /// threshold 0 is flagged exactly when the shelf is empty.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.min_stock_level
    }
}

// ============================================================================
// Transactions
// ============================================================================

/// Lifecycle state of a transaction.
///
/// Sales are written as `Completed` in the same transaction that
/// adjusts stock. The other states exist for refund and void flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
    Refunded,
}

/// How a sale was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    MobileMoney,
    BankTransfer,
}

/// A completed (or otherwise terminal) sale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub receipt_number: String,
    pub status: TransactionStatus,
    pub total_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Stock Adjustments
// ============================================================================

/// How a stock adjustment interprets its quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    Increase,
    Decrease,
    Recount,
}

/// Audit record of a manual stock change.
///
/// `quantity_change` stores the operator's input exactly as submitted,
/// sign included, even when the applied arithmetic used its magnitude.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockAdjustment {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    pub adjustment_type: AdjustmentType,
    pub quantity_change: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Cola 500ml".to_string(),
            description: None,
            barcode: Some("6001234567890".to_string()),
            cost_cents: 800,
            price_cents: 1500,
            stock_quantity: 10,
            min_stock_level: 10,
            category: Some("Drinks".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(serde_json::to_string(&Role::Cashier).unwrap(), "\"cashier\"");
        assert_eq!(
            serde_json::to_string(&PaymentMethod::MobileMoney).unwrap(),
            "\"mobile_money\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::to_string(&AdjustmentType::Recount).unwrap(),
            "\"recount\""
        );

        let method: PaymentMethod = serde_json::from_str("\"bank_transfer\"").unwrap();
        assert_eq!(method, PaymentMethod::BankTransfer);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: "u-1".to_string(),
            username: "amina".to_string(),
            email: "amina@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            role: Role::Manager,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"username\":\"amina\""));
    }

    #[test]
    fn test_low_stock_boundary_is_inclusive() {
        let mut product = sample_product();
        assert!(product.is_low_stock()); // 10 <= 10

        product.stock_quantity = 11;
        assert!(!product.is_low_stock());

        product.stock_quantity = 0;
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_zero_threshold_flags_only_empty_shelves() {
        let mut product = sample_product();
        product.min_stock_level = 0;
        product.stock_quantity = 5;
        assert!(!product.is_low_stock());

        product.stock_quantity = 0;
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_tax_rate_application() {
        let rate = TaxRate::from_bps(1500);
        assert_eq!(rate.tax_on(Money::from_cents(3900)).cents(), 585);
        assert_eq!(TaxRate::ZERO.tax_on(Money::from_cents(3900)).cents(), 0);
    }
}
