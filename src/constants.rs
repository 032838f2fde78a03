//! Tuning constants shared across the decision engine.
//!
//! These values seed [`crate::config::BotConfig::default`]. Hosts that want
//! different tuning load a TOML file instead of editing this module.

/// Height of a player's eyes above its origin, in world units.
pub const EYE_HEIGHT: f32 = 28.0;
/// Radius of the spherical hull used for player hit tests.
pub const PLAYER_HULL_RADIUS: f32 = 16.0;

/// Horizontal half-angle of the bot view cone, in degrees.
pub const FOV_HALF_ANGLE_H: f32 = 50.0;
/// Vertical half-angle of the bot view cone, in degrees.
pub const FOV_HALF_ANGLE_V: f32 = 45.0;
/// Fraction of the horizontal half-angle treated as the focus zone.
pub const FOV_FOCUS_FRACTION: f32 = 0.5;

/// Sound volume at or above which a bot pays attention.
pub const SOUND_ATTENTION_VOLUME: f32 = 0.4;
/// Seconds a heard sound remains a usable hint.
pub const SOUND_MEMORY_SECONDS: f32 = 3.0;
/// Maximum distance at which a sound can be heard at full volume.
pub const SOUND_HEARING_RANGE: f32 = 1200.0;

/// Threat score difference beyond which danger beats proximity.
pub const MULTIGUN_MARGIN: u32 = 15;
/// Minimum threat score required before the bot engages.
pub const MIN_ENGAGE_THREAT: u32 = 10;
/// Seconds a last sighting stays valid for guessing.
pub const ENEMY_MEMORY_SECONDS: f32 = 5.0;
/// Growth of the guess jitter radius per second since the last sighting.
pub const GUESS_UNCERTAINTY_PER_SECOND: f32 = 60.0;
/// Upper bound on the guess jitter radius.
pub const GUESS_MAX_JITTER: f32 = 240.0;
/// Longest extrapolation of a remembered enemy velocity, in seconds.
pub const GUESS_MAX_EXTRAPOLATION: f32 = 1.0;
/// Distance beyond which enemies contribute no distance threat.
pub const MAX_ENGAGE_DISTANCE: f32 = 2000.0;
/// Upper bound of every threat score.
pub const MAX_THREAT_SCORE: u32 = 100;

/// Maximum aim turn speed in degrees per second at full skill.
pub const MAX_TURN_RATE: f32 = 720.0;
/// Fraction of the remaining aim error closed each tick before capping.
pub const TRACKING_GAIN: f32 = 0.6;
/// Aim spread applied even at maximum skill, in degrees.
pub const MIN_AIM_SPREAD: f32 = 0.5;
/// Extra aim spread at zero skill, in degrees, before degradation scaling.
pub const MAX_AIM_SPREAD: f32 = 12.0;

/// Default per-bot skill in `[0, 1]`, where `1` is the most accurate.
pub const DEFAULT_SKILL: f32 = 0.6;
/// Lower bound of the process-wide inaccuracy degradation.
pub const MIN_DEGRADATION: f32 = 0.5;
/// Upper bound of the process-wide inaccuracy degradation.
pub const MAX_DEGRADATION: f32 = 1.5;
/// Seconds between refreshes of the process-wide inaccuracy parameter.
pub const SKILL_REFRESH_SECONDS: f32 = 2.0;
/// Largest shared aim wobble, in degrees, at the maximum degradation.
pub const MAX_AIM_WOBBLE: f32 = 3.0;

/// Grenade fuse length in seconds once primed.
pub const GRENADE_FUSE_SECONDS: f32 = 3.8;
/// Horizontal throw speed of a grenade in units per second.
pub const GRENADE_THROW_SPEED: f32 = 600.0;
/// Farthest point a grenade can be thrown at.
pub const GRENADE_MAX_RANGE: f32 = 900.0;
/// Closest point a damaging grenade is thrown at.
pub const GRENADE_MIN_RANGE: f32 = 180.0;
/// Seconds kept between the fuse end and a forced throw.
pub const GRENADE_SAFETY_MARGIN: f32 = 0.4;
/// Threat score above which a visible enemy may draw a grenade.
pub const GRENADE_THREAT: u32 = 60;
/// Percent chance per qualifying tick of throwing at a visible enemy.
pub const GRENADE_CHANCE_PERCENT: i64 = 4;
/// Radius of the ring searched around a hidden grenade target.
pub const GRENADE_POINT_RADIUS: f32 = 128.0;
/// Number of points sampled on the grenade search ring.
pub const GRENADE_POINT_SAMPLES: i64 = 8;
