//! Bounded random number generation.
//!
//! Every stochastic decision in the engine (aim jitter, grenade choice,
//! position guessing, team picks) draws through [`RandomSource`] so that
//! tests can replace the generator with a fixed sequence.
//!
//! Both functions treat their bounds as inclusive. When `low > high` the
//! bounds are swapped; the same policy applies to integers and floats. A
//! non-finite float bound yields `low` unchanged.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of bounded random values.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// Uniform integer in `[low, high]`.
    fn random_long(&mut self, low: i64, high: i64) -> i64;

    /// Uniform float in `[low, high]`.
    fn random_float(&mut self, low: f32, high: f32) -> f32;
}

/// Point `unit` of the way from `lo` to `hi`, without forming `hi - lo`.
fn lerp(lo: f32, hi: f32, unit: f32) -> f32 {
    (lo * (1.0 - unit) + hi * unit).max(lo).min(hi)
}

fn ordered<T: PartialOrd>(low: T, high: T) -> (T, T) {
    if low > high {
        (high, low)
    } else {
        (low, high)
    }
}

/// Production generator backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Deterministic generator seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for StdRandom {
    fn random_long(&mut self, low: i64, high: i64) -> i64 {
        let (lo, hi) = ordered(low, high);
        if lo == hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    fn random_float(&mut self, low: f32, high: f32) -> f32 {
        if !(low.is_finite() && high.is_finite()) {
            return low;
        }
        let (lo, hi) = ordered(low, high);
        if lo == hi {
            return lo;
        }
        // Spans wider than `f32::MAX` overflow `gen_range`.
        let unit = self.rng.gen_range(0.0..=1.0_f32);
        lerp(lo, hi, unit)
    }
}

/// Generator replaying a fixed sequence of unit draws.
///
/// Each call consumes the next value `u` in `[0, 1]` and maps it onto the
/// requested range: floats become `low + u * (high - low)` and integers round
/// that value to the nearest step. The sequence repeats once exhausted. An
/// empty sequence always yields `low`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Replays `draws`, each clamped into `[0, 1]`.
    #[must_use]
    pub fn new(draws: impl IntoIterator<Item = f32>) -> Self {
        Self {
            draws: draws.into_iter().map(|d| d.clamp(0.0, 1.0)).collect(),
            cursor: 0,
        }
    }

    /// Always returns the midpoint of the requested range.
    #[must_use]
    pub fn midpoint() -> Self {
        Self::new([0.5])
    }

    fn next_unit(&mut self) -> f32 {
        let Some(&draw) = self.draws.get(self.cursor % self.draws.len().max(1)) else {
            return 0.0;
        };
        self.cursor = self.cursor.wrapping_add(1);
        draw
    }
}

impl RandomSource for ScriptedRandom {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        reason = "The offset is clamped to the span before converting back."
    )]
    fn random_long(&mut self, low: i64, high: i64) -> i64 {
        let (lo, hi) = ordered(low, high);
        let span = hi.saturating_sub(lo);
        let offset = (self.next_unit() * span as f32).round() as i64;
        lo.saturating_add(offset.clamp(0, span))
    }

    fn random_float(&mut self, low: f32, high: f32) -> f32 {
        let (lo, hi) = ordered(low, high);
        lerp(lo, hi, self.next_unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10)]
    #[case(-5, 5)]
    #[case(7, 7)]
    #[case(10, 0)]
    fn longs_stay_in_bounds(#[case] low: i64, #[case] high: i64) {
        let mut rng = StdRandom::seeded(7);
        let (lo, hi) = ordered(low, high);
        for _ in 0..1000 {
            let v = rng.random_long(low, high);
            assert!((lo..=hi).contains(&v), "{v} outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn longs_cover_range_uniformly() {
        let mut rng = StdRandom::seeded(11);
        let mut buckets = [0_u32; 10];
        let samples = 20_000;
        for _ in 0..samples {
            let v = rng.random_long(0, 9);
            let slot = usize::try_from(v).expect("non-negative draw");
            if let Some(bucket) = buckets.get_mut(slot) {
                *bucket += 1;
            }
        }
        let expected = f64::from(samples) / 10.0;
        let chi_square: f64 = buckets
            .iter()
            .map(|&b| {
                let diff = f64::from(b) - expected;
                diff * diff / expected
            })
            .sum();
        // 9 degrees of freedom, p = 0.001 critical value.
        assert!(chi_square < 27.88, "chi-square {chi_square} too large");
    }

    #[test]
    fn floats_stay_in_bounds_and_spread() {
        let mut rng = StdRandom::seeded(3);
        let mut low_half = 0;
        for _ in 0..4000 {
            let v = rng.random_float(-2.0, 2.0);
            assert!((-2.0..=2.0).contains(&v));
            if v < 0.0 {
                low_half += 1;
            }
        }
        assert!((1800..=2200).contains(&low_half), "{low_half}");
    }

    #[test]
    fn reversed_float_bounds_are_swapped() {
        let mut rng = StdRandom::seeded(5);
        for _ in 0..100 {
            let v = rng.random_float(3.0, 1.0);
            assert!((1.0..=3.0).contains(&v));
        }
    }

    #[rstest]
    #[case::whole_float_line(-f32::MAX, f32::MAX)]
    #[case::reversed_whole_line(f32::MAX, -f32::MAX)]
    #[case::wide_positive(-1.0, f32::MAX)]
    fn huge_float_spans_stay_in_bounds(#[case] low: f32, #[case] high: f32) {
        let mut rng = StdRandom::seeded(17);
        let (lo, hi) = ordered(low, high);
        for _ in 0..100 {
            let v = rng.random_float(low, high);
            assert!(v.is_finite() && (lo..=hi).contains(&v), "{v}");
        }
    }

    #[test]
    fn infinite_float_bound_yields_low() {
        let mut rng = StdRandom::seeded(19);
        assert_eq!(rng.random_float(2.0, f32::INFINITY).to_bits(), 2.0_f32.to_bits());
        assert!(rng.random_float(f32::NAN, 1.0).is_nan());
    }

    #[test]
    fn scripted_maps_draws_onto_range() {
        let mut rng = ScriptedRandom::new([0.0, 1.0, 0.5]);
        assert_eq!(rng.random_long(2, 6), 2);
        assert_eq!(rng.random_long(2, 6), 6);
        assert_eq!(rng.random_long(2, 6), 4);
        assert!((rng.random_float(-1.0, 1.0) + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_script_yields_low() {
        let mut rng = ScriptedRandom::default();
        assert_eq!(rng.random_long(3, 9), 3);
        assert!((rng.random_float(1.5, 9.0) - 1.5).abs() < f32::EPSILON);
    }
}
