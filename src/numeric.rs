//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between floating-point and integer
//! domains so that scores, counts and random indices never wrap.

/// Round a score and clamp it into `[0, max]`.
///
/// Non-finite inputs map to `0`.
///
/// # Examples
/// ```
/// use fortbot::numeric::clamp_score;
/// assert_eq!(clamp_score(42.6, 100), 43);
/// assert_eq!(clamp_score(-5.0, 100), 0);
/// assert_eq!(clamp_score(250.0, 100), 100);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "The value is clamped to [0, max] before casting."
)]
#[must_use]
pub fn clamp_score(value: f32, max: u32) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let upper = max as f32;
    value.round().clamp(0.0, upper) as u32
}

/// Convert a small count into `f32`.
#[expect(
    clippy::cast_precision_loss,
    reason = "Counts handled here are far below f32 precision limits."
)]
#[must_use]
pub const fn count_to_f32(count: usize) -> f32 {
    count as f32
}

/// Convert a random draw into an index below `len`, returning `None` when
/// the draw falls outside the slice.
#[must_use]
pub fn index_from_draw(draw: i64, len: usize) -> Option<usize> {
    usize::try_from(draw).ok().filter(|&index| index < len)
}

/// Convert a bounded count into the `i64` domain used by random draws.
#[must_use]
pub fn count_to_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
