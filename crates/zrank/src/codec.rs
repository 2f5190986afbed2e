//! Composite score packing.
//!
//! A composite score carries two things in one sortable `f64`:
//!
//! ```text
//!  value . delta
//!  ^^^^^   ^^^^^ window_end - update_ts, zero-padded to `width` digits
//!  accumulated ranking value
//! ```
//!
//! Both parts are packed as the fixed-point integer `value * 10^width +
//! delta` and only divided down into a float at the store boundary. An
//! earlier update leaves a larger `delta`, so with equal values the earlier
//! update sorts higher and wins the tie in descending order.
//!
//! Every packed integer stays below [`PRECISION_LIMIT`], which keeps it
//! exactly representable in an `f64` and keeps decode exact. Values that
//! would cross it are rejected, never truncated.

use crate::{Error, Result};

/// Significant decimal digits a composite score may use.
pub const MAX_SIGNIFICANT_DIGITS: u32 = 15;

/// Exclusive upper bound of the packed fixed-point integer.
pub const PRECISION_LIMIT: u64 = 10u64.pow(MAX_SIGNIFICANT_DIGITS);

/// Number of decimal digits in `span`, and so the tie-break width a window of
/// that many seconds needs. Zero counts as one digit.
///
/// ```
/// assert_eq!(zrank::digit_width(9), 1);
/// assert_eq!(zrank::digit_width(864_000), 6);
/// ```
pub const fn digit_width(span: u64) -> u32 {
    match span.checked_ilog10() {
        Some(log) => log + 1,
        None => 1,
    }
}

/// Largest ranking value that still fits next to `width` tie-break digits.
pub const fn max_value(width: u32) -> u64 {
    match 10u64.checked_pow(width) {
        Some(scale) if scale < PRECISION_LIMIT => PRECISION_LIMIT / scale - 1,
        _ => 0,
    }
}

/// Packs `value` and the recency of `now` into a composite score.
///
/// `delta = window_end - now` becomes the fraction. A `now` past the window
/// end is clamped to a zero delta (the most recent position) so late updates
/// still add up instead of being dropped.
///
/// # Errors
///
/// [`Error::EncodingOverflow`] when `delta` needs more than `width` digits
/// (an update from before the window started) or when the packed value
/// reaches [`PRECISION_LIMIT`].
///
/// # Example
///
/// ```
/// let score = zrank::encode(100, 1_669_823_999 - 42, 1_669_823_999, 7).unwrap();
/// assert_eq!(score, 100.0000042);
/// ```
pub fn encode(value: u64, now: i64, window_end: i64, width: u32) -> Result<f64> {
    let overflow = || Error::EncodingOverflow { value, width };

    let scale = 10u64.checked_pow(width).ok_or_else(overflow)?;
    let delta = window_end.saturating_sub(now).max(0) as u64;
    if delta >= scale {
        return Err(overflow());
    }

    let fixed = value
        .checked_mul(scale)
        .and_then(|packed| packed.checked_add(delta))
        .filter(|&packed| packed < PRECISION_LIMIT)
        .ok_or_else(overflow)?;

    Ok(fixed as f64 / scale as f64)
}

/// Recovers the ranking value from a composite score.
///
/// A score without a fractional part is a value with a zero tie-break, which
/// is what an update at or after the window end produces.
///
/// # Errors
///
/// [`Error::MalformedScore`] for negative, non-finite, or out-of-range
/// scores. None of those can come out of [`encode`].
///
/// # Example
///
/// ```
/// assert_eq!(zrank::decode(200.2013085, 7).unwrap(), 200);
/// assert_eq!(zrank::decode(150.0, 7).unwrap(), 150);
/// ```
pub fn decode(score: f64, width: u32) -> Result<u64> {
    let malformed = || Error::MalformedScore { score };

    if !score.is_finite() || score < 0.0 {
        return Err(malformed());
    }
    let scale = 10u64.checked_pow(width).ok_or_else(malformed)?;

    let fixed = (score * scale as f64).round();
    if fixed >= PRECISION_LIMIT as f64 {
        return Err(malformed());
    }

    Ok(fixed as u64 / scale)
}

/// Snaps `score` back onto the `10^-width` grid [`encode`] packs onto.
///
/// Adding a composite to an integer base in `f64` can land one ulp away from
/// the float [`encode`] would produce for the same total, which is enough to
/// reorder two members that are really tied. Stores pass every sum through
/// here so equal composites compare equal. For any sum below
/// [`PRECISION_LIMIT`] the result is bit-identical to encoding the same
/// value and delta directly, and its integer part is left alone.
///
/// Non-finite scores and widths with no `u64` scale are returned unchanged.
///
/// ```
/// let sum = 100.0 + zrank::encode(100, 1_669_823_999 - 2_013_084, 1_669_823_999, 7).unwrap();
/// assert_eq!(zrank::canonical(sum, 7), 200.2013084);
/// ```
pub fn canonical(score: f64, width: u32) -> f64 {
    let Some(scale) = 10u64.checked_pow(width) else {
        return score;
    };
    if !score.is_finite() {
        return score;
    }
    let scale = scale as f64;
    (score * scale).round() / scale
}
