//! Stock rounding rule.
//!
//! Every quantity that reaches an ingredient's stock, or the inflow ledger, is
//! first rounded to the number of decimal places declared by the ingredient's
//! measurement unit. Ledger and stock must always see the same rounded value.

use crate::{EngineError, ResultEngine};

/// Highest precision a measurement unit may declare.
///
/// Beyond this an `f64` no longer carries meaningful decimal digits.
pub const MAX_PRECISION: i32 = 15;

/// Round `value` to `precision` decimal places, half away from zero.
///
/// `precision` is clamped to `0..=MAX_PRECISION`. Magnitudes whose scaled
/// value reaches 2^53 carry no fractional digits at that precision and are
/// returned unchanged.
pub fn round_to_precision(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision.clamp(0, MAX_PRECISION));
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= EXACT_INTEGER_LIMIT {
        return value;
    }
    scaled.round() / factor
}

/// 2^53, past which every `f64` is an integer.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Reject NaN and infinities before they reach the database.
pub(crate) fn ensure_finite(value: f64, label: &str) -> ResultEngine<f64> {
    if !value.is_finite() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be a finite number"
        )));
    }
    Ok(value)
}

pub(crate) fn ensure_precision(precision: i32) -> ResultEngine<i32> {
    if !(0..=MAX_PRECISION).contains(&precision) {
        return Err(EngineError::InvalidAmount(format!(
            "precision must be between 0 and {MAX_PRECISION}"
        )));
    }
    Ok(precision)
}
