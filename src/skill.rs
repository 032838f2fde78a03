//! Process-wide aim inaccuracy shared by every bot.
//!
//! The parameter has two parts. `degradation` scales every bot's aim spread
//! and is redrawn from `[min_degradation, max_degradation]` on each refresh.
//! `wobble` is a small shared aim offset, redrawn alongside it, that makes
//! low-skill bots drift together between refreshes.
//!
//! A bot's spread in degrees is
//! `min_spread + max_spread * (1 - skill) * degradation`, so a bot at skill
//! `1.0` only ever carries the minimum spread.

use glam::Vec2;
use log::debug;

use crate::config::{AimConfig, SkillConfig};
use crate::random::RandomSource;

/// Shared inaccuracy state, refreshed on its own cadence.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillInaccuracy {
    degradation: f32,
    wobble: Vec2,
    next_refresh: f32,
}

impl SkillInaccuracy {
    /// Parameter at the midpoint of the configured range, due immediately.
    #[must_use]
    pub fn new(config: &SkillConfig) -> Self {
        let low = config.min_degradation.max(0.0);
        let high = config.max_degradation.max(low);
        Self {
            degradation: (low + high) * 0.5,
            wobble: Vec2::ZERO,
            next_refresh: 0.0,
        }
    }

    /// Current spread multiplier, always within the configured bounds.
    #[must_use]
    pub const fn degradation(&self) -> f32 {
        self.degradation
    }

    /// Current shared aim offset in degrees (`x` yaw, `y` pitch).
    #[must_use]
    pub const fn wobble(&self) -> Vec2 {
        self.wobble
    }

    /// Redraw the parameter regardless of cadence.
    pub fn refresh(&mut self, rng: &mut dyn RandomSource, config: &SkillConfig) {
        let low = config.min_degradation.max(0.0);
        let high = config.max_degradation.max(low);
        self.degradation = rng.random_float(low, high).clamp(low, high);
        let reach = if high > 0.0 {
            config.max_wobble * self.degradation / high
        } else {
            0.0
        };
        self.wobble = Vec2::new(
            rng.random_float(-reach, reach),
            rng.random_float(-reach, reach),
        );
        debug!(
            "skill inaccuracy refreshed: degradation {:.3}, wobble {:?}",
            self.degradation, self.wobble
        );
    }

    /// Refresh when `now` has reached the next scheduled refresh.
    ///
    /// Returns whether a refresh happened.
    pub fn update(&mut self, now: f32, rng: &mut dyn RandomSource, config: &SkillConfig) -> bool {
        if now < self.next_refresh {
            return false;
        }
        self.refresh(rng, config);
        self.next_refresh = now + config.refresh_seconds;
        true
    }

    /// Aim spread half-width in degrees for a bot of `skill`.
    #[must_use]
    pub fn spread_degrees(&self, skill: f32, aim: &AimConfig) -> f32 {
        let clumsiness = 1.0 - skill.clamp(0.0, 1.0);
        aim.min_spread + aim.max_spread * clumsiness * self.degradation
    }

    /// Shared wobble scaled for a bot of `skill`.
    #[must_use]
    pub fn wobble_for(&self, skill: f32) -> Vec2 {
        self.wobble * (1.0 - skill.clamp(0.0, 1.0))
    }
}
