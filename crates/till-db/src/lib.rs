//! # till-db: Database Layer
//!
//! SQLite persistence for Till POS. Owns the connection pool, the
//! embedded migrations, password hashing, and one repository per
//! aggregate:
//!
//! - [`UserRepository`]: staff accounts
//! - [`ProductRepository`]: catalogue and stock levels
//! - [`SaleRepository`]: atomic sale writes, receipts, history
//! - [`StockRepository`]: manual stock adjustments with audit trail
//! - [`ReportRepository`]: sales and profit/loss aggregation
//!
//! Everything enters and leaves as `till-core` types; SQL stays inside
//! this crate.

pub mod error;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{
    PaymentMethodSummary, ProductRepository, ProfitLossReport, ReceiptLine, ReportRepository,
    SaleRepository, SalesReport, StockRepository, TopProduct, UserRepository,
};
