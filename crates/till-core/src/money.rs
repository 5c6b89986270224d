//! Money type backed by integer cents.
//!
//! All monetary amounts in Till POS are stored and computed as whole
//! cents in an `i64`. Floating point never touches money: the database,
//! the calculations, and the RPC payloads all use cents.
//!
//! ## Example
//!
//! ```
//! use till_core::Money;
//!
//! let price = Money::from_cents(1250); // $12.50
//! let total = price * 3;
//! assert_eq!(total.cents(), 3750);
//! assert_eq!(total.to_string(), "$37.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A monetary amount in whole cents.
///
/// Wraps an `i64`, giving a range of roughly ±92 quadrillion dollars,
/// far beyond anything a till will see. Negative values are permitted
/// so that intermediate arithmetic (refunds, discount overshoot) stays
/// representable.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount
    pub const ZERO: Money = Money(0);

    /// Create from a cent count
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// The raw cent count
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// True if the amount is exactly zero
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// True if the amount is below zero
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition, `None` on overflow
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked subtraction, `None` on overflow
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Checked multiplication by a quantity, `None` on overflow
    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// Subtraction that clamps at the representable minimum
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Tax on this amount at a rate given in basis points (1 bp = 0.01%).
    ///
    /// Rounds half up to the nearest cent. Intermediate math is done in
    /// `i128`, so no realistic amount can overflow. Callers validate
    /// that the amount is non-negative before applying tax.
    ///
    /// ## Example
    ///
    /// ```
    /// use till_core::Money;
    ///
    /// // $39.00 at 15.00% -> $5.85
    /// let tax = Money::from_cents(3900).tax_at_bps(1500);
    /// assert_eq!(tax.cents(), 585);
    /// ```
    pub fn tax_at_bps(self, bps: u32) -> Money {
        let raw = self.0 as i128 * bps as i128;
        Money(((raw + 5_000) / 10_000) as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, quantity: i64) -> Money {
        Money(self.0 * quantity)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);

        assert_eq!((a + b).cents(), 1250);
        assert_eq!((a - b).cents(), 750);
        assert_eq!((b - a).cents(), -750);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_sum_of_line_totals() {
        let lines = [
            Money::from_cents(3000),
            Money::from_cents(2400),
            Money::from_cents(599),
        ];
        let total: Money = lines.into_iter().sum();
        assert_eq!(total.cents(), 5999);
    }

    #[test]
    fn test_checked_operations() {
        let max = Money::from_cents(i64::MAX);
        assert!(max.checked_add(Money::from_cents(1)).is_none());
        assert!(max.checked_mul(2).is_none());
        assert_eq!(
            Money::from_cents(100).checked_mul(5),
            Some(Money::from_cents(500))
        );
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // Exact: $39.00 at 15% = $5.85
        assert_eq!(Money::from_cents(3900).tax_at_bps(1500).cents(), 585);

        // $1.50 at 15% = 22.5 cents, rounds half up to 23
        assert_eq!(Money::from_cents(150).tax_at_bps(1500).cents(), 23);

        // $1.43 at 15% = 21.45 cents, rounds down to 21
        assert_eq!(Money::from_cents(143).tax_at_bps(1500).cents(), 21);

        // Zero rate produces zero tax
        assert_eq!(Money::from_cents(99_999).tax_at_bps(0).cents(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(-150).to_string(), "-$1.50");
    }

    #[test]
    fn test_serde_is_transparent() {
        let m = Money::from_cents(3985);
        assert_eq!(serde_json::to_string(&m).unwrap(), "3985");
        let back: Money = serde_json::from_str("3985").unwrap();
        assert_eq!(back, m);
    }
}
