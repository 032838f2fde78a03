//! Tuning configuration for the decision engine.
//!
//! Every field falls back to the matching constant in [`crate::constants`],
//! so a TOML file only needs the values it overrides:
//!
//! ```
//! use fortbot::config::BotConfig;
//! let config = BotConfig::from_toml_str("[aim]\nmax_turn_rate = 360.0\n").unwrap();
//! assert!((config.aim.max_turn_rate - 360.0).abs() < f32::EPSILON);
//! assert!((config.aim.tracking_gain - fortbot::TRACKING_GAIN).abs() < f32::EPSILON);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value lies outside its permitted range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What the value violates.
        reason: String,
    },
}

/// View cone and hearing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Horizontal half-angle of the view cone, in degrees.
    pub fov_half_angle_h: f32,
    /// Vertical half-angle of the view cone, in degrees.
    pub fov_half_angle_v: f32,
    /// Share of the horizontal half-angle counted as focus.
    pub focus_fraction: f32,
    /// Quietest sound a bot reacts to.
    pub sound_attention_volume: f32,
    /// Seconds a heard sound stays usable.
    pub sound_memory_seconds: f32,
    /// Distance at which a full-volume sound fades out.
    pub hearing_range: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            fov_half_angle_h: FOV_HALF_ANGLE_H,
            fov_half_angle_v: FOV_HALF_ANGLE_V,
            focus_fraction: FOV_FOCUS_FRACTION,
            sound_attention_volume: SOUND_ATTENTION_VOLUME,
            sound_memory_seconds: SOUND_MEMORY_SECONDS,
            hearing_range: SOUND_HEARING_RANGE,
        }
    }
}

/// Target selection and enemy memory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    /// Threat gap beyond which danger beats proximity.
    pub multigun_margin: u32,
    /// Lowest aggregate threat worth engaging.
    pub min_engage_threat: u32,
    /// Seconds a sighting is remembered once the enemy is hidden.
    pub enemy_memory_seconds: f32,
    /// Guess jitter growth per second since the sighting.
    pub guess_uncertainty_per_second: f32,
    /// Cap on the guess jitter radius.
    pub guess_max_jitter: f32,
    /// Longest velocity extrapolation, in seconds.
    pub guess_max_extrapolation: f32,
    /// Distance at which the distance term of a threat reaches zero.
    pub max_engage_distance: f32,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            multigun_margin: MULTIGUN_MARGIN,
            min_engage_threat: MIN_ENGAGE_THREAT,
            enemy_memory_seconds: ENEMY_MEMORY_SECONDS,
            guess_uncertainty_per_second: GUESS_UNCERTAINTY_PER_SECOND,
            guess_max_jitter: GUESS_MAX_JITTER,
            guess_max_extrapolation: GUESS_MAX_EXTRAPOLATION,
            max_engage_distance: MAX_ENGAGE_DISTANCE,
        }
    }
}

/// Aim tracking and spread.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    /// Degrees per second at full skill.
    pub max_turn_rate: f32,
    /// Share of the remaining error closed per tick.
    pub tracking_gain: f32,
    /// Spread kept at full skill, in degrees.
    pub min_spread: f32,
    /// Extra spread at zero skill, in degrees.
    pub max_spread: f32,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            max_turn_rate: MAX_TURN_RATE,
            tracking_gain: TRACKING_GAIN,
            min_spread: MIN_AIM_SPREAD,
            max_spread: MAX_AIM_SPREAD,
        }
    }
}

/// Per-bot skill and the shared inaccuracy parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Skill of bots whose profile names none.
    pub default_skill: f32,
    /// Lower bound of the shared degradation.
    pub min_degradation: f32,
    /// Upper bound of the shared degradation.
    pub max_degradation: f32,
    /// Seconds between degradation refreshes.
    pub refresh_seconds: f32,
    /// Largest shared wobble, in degrees.
    pub max_wobble: f32,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            default_skill: DEFAULT_SKILL,
            min_degradation: MIN_DEGRADATION,
            max_degradation: MAX_DEGRADATION,
            refresh_seconds: SKILL_REFRESH_SECONDS,
            max_wobble: MAX_AIM_WOBBLE,
        }
    }
}

/// Grenade handling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrenadeConfig {
    /// Fuse length once primed.
    pub fuse_seconds: f32,
    /// Horizontal throw speed in units per second.
    pub throw_speed: f32,
    /// Farthest throw.
    pub max_range: f32,
    /// Nearest throw for damaging grenades.
    pub min_range: f32,
    /// Remaining fuse at which a held grenade is thrown regardless.
    pub safety_margin: f32,
    /// Threat above which a visible enemy may draw a grenade.
    pub threat_threshold: u32,
    /// Percent chance per qualifying tick.
    pub chance_percent: i64,
    /// Ring radius searched around a hidden target.
    pub point_radius: f32,
    /// Points sampled on that ring.
    pub point_samples: i64,
}

impl Default for GrenadeConfig {
    fn default() -> Self {
        Self {
            fuse_seconds: GRENADE_FUSE_SECONDS,
            throw_speed: GRENADE_THROW_SPEED,
            max_range: GRENADE_MAX_RANGE,
            min_range: GRENADE_MIN_RANGE,
            safety_margin: GRENADE_SAFETY_MARGIN,
            threat_threshold: GRENADE_THREAT,
            chance_percent: GRENADE_CHANCE_PERCENT,
            point_radius: GRENADE_POINT_RADIUS,
            point_samples: GRENADE_POINT_SAMPLES,
        }
    }
}

/// Think-cycle switches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThinkConfig {
    /// When false, bots never prime or throw grenades.
    pub grenades_enabled: bool,
}

impl Default for ThinkConfig {
    fn default() -> Self {
        Self {
            grenades_enabled: true,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// `[perception]` table.
    pub perception: PerceptionConfig,
    /// `[threat]` table.
    pub threat: ThreatConfig,
    /// `[aim]` table.
    pub aim: AimConfig,
    /// `[skill]` table.
    pub skill: SkillConfig,
    /// `[grenade]` table.
    pub grenade: GrenadeConfig,
    /// `[think]` table.
    pub think: ThinkConfig,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn require_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must lie in [0, 1], got {value}")))
    }
}

fn require_half_angle(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 180.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must lie in (0, 180], got {value}")))
    }
}

impl BotConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`BotConfig::from_toml_str`].
    pub fn load(file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = file.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check every field against its permitted range.
    ///
    /// # Errors
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.perception;
        require_half_angle("perception.fov_half_angle_h", p.fov_half_angle_h)?;
        require_half_angle("perception.fov_half_angle_v", p.fov_half_angle_v)?;
        require_unit("perception.focus_fraction", p.focus_fraction)?;
        require_positive("perception.sound_memory_seconds", p.sound_memory_seconds)?;
        require_positive("perception.hearing_range", p.hearing_range)?;

        let t = &self.threat;
        require_positive("threat.enemy_memory_seconds", t.enemy_memory_seconds)?;
        require_positive("threat.max_engage_distance", t.max_engage_distance)?;
        if t.guess_max_jitter < 0.0 || t.guess_uncertainty_per_second < 0.0 {
            return Err(invalid("threat.guess_max_jitter", "must not be negative"));
        }

        let a = &self.aim;
        require_positive("aim.max_turn_rate", a.max_turn_rate)?;
        require_unit("aim.tracking_gain", a.tracking_gain)?;
        if a.min_spread < 0.0 || a.max_spread < 0.0 {
            return Err(invalid("aim.min_spread", "spreads must not be negative"));
        }

        let s = &self.skill;
        require_unit("skill.default_skill", s.default_skill)?;
        if s.min_degradation < 0.0 {
            return Err(invalid(
                "skill.min_degradation",
                format!("must not be negative, got {}", s.min_degradation),
            ));
        }
        if s.min_degradation > s.max_degradation {
            return Err(invalid(
                "skill.max_degradation",
                format!(
                    "must be at least min_degradation ({}), got {}",
                    s.min_degradation, s.max_degradation
                ),
            ));
        }
        require_positive("skill.refresh_seconds", s.refresh_seconds)?;

        let g = &self.grenade;
        require_positive("grenade.fuse_seconds", g.fuse_seconds)?;
        require_positive("grenade.throw_speed", g.throw_speed)?;
        if g.min_range > g.max_range {
            return Err(invalid("grenade.min_range", "must not exceed max_range"));
        }
        if g.point_samples < 1 {
            return Err(invalid("grenade.point_samples", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_validate() {
        assert!(BotConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = BotConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, BotConfig::default());
    }

    #[rstest]
    #[case::inverted_degradation(
        "[skill]\nmin_degradation = 2.0\nmax_degradation = 1.0\n",
        "skill.max_degradation"
    )]
    #[case::negative_degradation("[skill]\nmin_degradation = -0.5\n", "skill.min_degradation")]
    #[case::wide_fov("[perception]\nfov_half_angle_h = 200.0\n", "perception.fov_half_angle_h")]
    #[case::zero_turn_rate("[aim]\nmax_turn_rate = 0.0\n", "aim.max_turn_rate")]
    fn rejects_out_of_range(#[case] source: &str, #[case] expected_field: &str) {
        match BotConfig::from_toml_str(source) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            BotConfig::from_toml_str("[aim\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            BotConfig::load("/definitely/not/here.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
