//! Sale totals computation.
//!
//! The math every sale goes through, in one place:
//!
//! ```text
//!   subtotal = Σ (quantity × unit_price)
//!   tax      = subtotal × tax_rate        (pre-discount, rounded half up)
//!   total    = subtotal + tax − discount
//! ```
//!
//! Tax is charged on the undiscounted subtotal. The total is NOT
//! clamped at zero: a discount larger than subtotal plus tax produces
//! a negative total, which the records keep as-is.

use crate::money::Money;
use crate::types::TaxRate;
use serde::{Deserialize, Serialize};

/// One line of a sale, before persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub quantity: i64,
    pub unit_price: Money,
}

impl SaleLine {
    /// Quantity times unit price
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// The three derived amounts of a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl SaleTotals {
    /// Compute totals for a validated set of lines.
    ///
    /// Infallible by construction: validation caps quantities at 999,
    /// line counts at 100, and unit prices at $999,999,999.99, so the
    /// sums stay far inside `i64`.
    ///
    /// ## Example
    ///
    /// ```
    /// use till_core::{Money, SaleLine, SaleTotals, TaxRate};
    ///
    /// let lines = [
    ///     SaleLine { quantity: 2, unit_price: Money::from_cents(1500) },
    ///     SaleLine { quantity: 3, unit_price: Money::from_cents(800) },
    /// ];
    /// let totals = SaleTotals::compute(&lines, TaxRate::from_bps(1500), Money::from_cents(500));
    ///
    /// assert_eq!(totals.subtotal.cents(), 3900);
    /// assert_eq!(totals.tax.cents(), 585);
    /// assert_eq!(totals.total.cents(), 3985);
    /// ```
    pub fn compute(lines: &[SaleLine], tax_rate: TaxRate, discount: Money) -> SaleTotals {
        let subtotal: Money = lines.iter().map(SaleLine::line_total).sum();
        let tax = tax_rate.tax_on(subtotal);
        let total = subtotal + tax - discount;
        SaleTotals {
            subtotal,
            tax,
            total,
        }
    }
}
