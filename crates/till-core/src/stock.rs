//! Stock adjustment arithmetic.
//!
//! Operators submit a signed `quantity_change` together with an
//! [`AdjustmentType`]. The type decides how the number is read:
//!
//! - `increase`: add the magnitude to current stock
//! - `decrease`: subtract the magnitude, clamped at zero
//! - `recount`:  replace stock with the value, clamped at zero
//!
//! The sign of the input is deliberately ignored for increase and
//! decrease, so `decrease` with `-3` and with `3` both remove three
//! units. The audit trail stores the operator's signed input either
//! way.

use crate::types::AdjustmentType;

/// New stock level after applying an adjustment to `current`.
///
/// Never returns a negative level.
///
/// ## Example
///
/// ```
/// use till_core::{apply_adjustment, AdjustmentType};
///
/// assert_eq!(apply_adjustment(AdjustmentType::Increase, 10, 5), 15);
/// assert_eq!(apply_adjustment(AdjustmentType::Decrease, 10, -3), 7);
/// assert_eq!(apply_adjustment(AdjustmentType::Recount, 10, 42), 42);
/// ```
pub fn apply_adjustment(kind: AdjustmentType, current: i64, change: i64) -> i64 {
    match kind {
        AdjustmentType::Increase => current.saturating_add(change.saturating_abs()),
        AdjustmentType::Decrease => current.saturating_sub(change.saturating_abs()).max(0),
        AdjustmentType::Recount => change.max(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_uses_magnitude() {
        assert_eq!(apply_adjustment(AdjustmentType::Increase, 100, 25), 125);
        assert_eq!(apply_adjustment(AdjustmentType::Increase, 100, -25), 125);
        assert_eq!(apply_adjustment(AdjustmentType::Increase, 0, 1), 1);
    }

    #[test]
    fn test_decrease_clamps_at_zero() {
        assert_eq!(apply_adjustment(AdjustmentType::Decrease, 100, 40), 60);
        assert_eq!(apply_adjustment(AdjustmentType::Decrease, 100, -40), 60);
        // Removing more than exists floors at zero
        assert_eq!(apply_adjustment(AdjustmentType::Decrease, 100, 150), 0);
    }

    #[test]
    fn test_recount_replaces_level() {
        assert_eq!(apply_adjustment(AdjustmentType::Recount, 100, 42), 42);
        assert_eq!(apply_adjustment(AdjustmentType::Recount, 0, 7), 7);
        // A negative recount cannot produce negative stock
        assert_eq!(apply_adjustment(AdjustmentType::Recount, 100, -5), 0);
    }

    #[test]
    fn test_extreme_values_do_not_wrap() {
        assert_eq!(
            apply_adjustment(AdjustmentType::Increase, i64::MAX, 1),
            i64::MAX
        );
        assert_eq!(
            apply_adjustment(AdjustmentType::Increase, 0, i64::MIN),
            i64::MAX
        );
    }
}
