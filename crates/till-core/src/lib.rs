//! # till-core: Pure Business Logic
//!
//! This crate contains all pure business logic for Till POS:
//! money arithmetic, sale totals, stock adjustment math, validation
//! rules, and the entity types shared by the database layer and the
//! RPC server.
//!
//! ## Golden Rule: NO I/O
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      till-core                           │
//! │                                                          │
//! │   Pure functions only. No database, no network,          │
//! │   no file system, no async.                              │
//! │                                                          │
//! │   Input → Calculation → Output                           │
//! │                                                          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`]: Integer-cents money type with safe arithmetic
//! - [`types`]: Entity types (User, Product, Transaction, ...)
//! - [`sale`]: Sale totals computation (subtotal, tax, total)
//! - [`stock`]: Stock adjustment arithmetic
//! - [`dates`]: Report date-range construction
//! - [`validation`]: Input validation rules
//! - [`error`]: Validation error types

pub mod dates;
pub mod error;
pub mod money;
pub mod sale;
pub mod stock;
pub mod types;
pub mod validation;

// Re-export commonly used types at crate root
pub use dates::DateRange;
pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use sale::{SaleLine, SaleTotals};
pub use stock::apply_adjustment;
pub use types::{
    AdjustmentType, PaymentMethod, Product, Role, StockAdjustment, TaxRate, Transaction,
    TransactionItem, TransactionStatus, User,
};

/// Maximum number of line items in a single sale
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity for a single line item
pub const MAX_ITEM_QUANTITY: i64 = 999;
