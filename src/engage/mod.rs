//! Turning a chosen target into aim and shots.
//!
//! [`shoot_at_enemy`] tracks the target with a rate-limited turn and asks
//! [`fire_weapon`] to shoot once the remaining aim error fits inside the
//! weapon's cone. Every shot is perturbed by the skill-scaled spread.

pub mod grenade;
pub mod weapons;

use glam::Vec3;
use log::trace;

use crate::agent::{BotAgent, Inventory};
use crate::config::AimConfig;
use crate::entity::EntityHandle;
use crate::frame::Frame;
use crate::random::RandomSource;
use crate::threat::EnemyCandidate;
use crate::vector_math::{angle_between, vec_to_angles, ViewAngles};

use self::weapons::{DangerTier, WeaponKind};

/// Errors below this many degrees are closed in one step.
const SNAP_DEGREES: f32 = 0.5;
/// Explosives are aimed this far below the target origin.
const SPLASH_AIM_DROP: f32 = 24.0;

/// Why a shot was not taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireDecline {
    /// The bot has no snapshot of itself this tick.
    NotReady,
    /// The weapon is not carried, or nothing is.
    NoWeapon,
    /// Not enough ammunition for one shot.
    NoAmmo,
    /// The target is inside the weapon's minimum range.
    TooClose,
    /// The target is beyond the weapon's reach.
    OutOfRange,
    /// The weapon's refire delay has not elapsed.
    Cooldown,
    /// The medikit is never used on an enemy that is already infected.
    TargetInfected,
}

/// Result of one call to [`fire_weapon`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireOutcome {
    /// A shot left the weapon.
    Fired {
        /// Weapon that fired.
        weapon: WeaponKind,
        /// Angles the shot actually left along.
        angles: ViewAngles,
        /// Degrees between the shot and the aim point.
        deviation: f32,
    },
    /// No shot was taken.
    Declined(FireDecline),
}

impl FireOutcome {
    /// Whether a shot left the weapon.
    #[must_use]
    pub const fn fired(&self) -> bool {
        matches!(self, Self::Fired { .. })
    }
}

/// What to shoot with and at whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FireRequest {
    /// Weapon to use; chosen automatically when `None`.
    pub weapon: Option<WeaponKind>,
    /// Entity being shot at, used for target-specific weapon rules.
    pub target: Option<EntityHandle>,
}

fn check_weapon(
    inventory: &Inventory,
    weapon: WeaponKind,
    distance: f32,
    target_infected: bool,
) -> Result<WeaponKind, FireDecline> {
    let spec = weapon.spec();
    if !inventory.carries(weapon) {
        Err(FireDecline::NoWeapon)
    } else if weapon == WeaponKind::Medikit && target_infected {
        Err(FireDecline::TargetInfected)
    } else if !inventory.can_fire(weapon) {
        Err(FireDecline::NoAmmo)
    } else if distance < spec.min_range {
        Err(FireDecline::TooClose)
    } else if distance > spec.max_range {
        Err(FireDecline::OutOfRange)
    } else {
        Ok(weapon)
    }
}

/// First carried weapon, in loadout order, usable at `distance`.
///
/// # Errors
/// When nothing qualifies, reports the most telling reason: nothing carried,
/// no ammunition at all, an infected target, too close, then out of range.
pub fn select_weapon(
    inventory: &Inventory,
    distance: f32,
    target_infected: bool,
) -> Result<WeaponKind, FireDecline> {
    let mut reasons = Vec::new();
    for &weapon in inventory.weapons() {
        match check_weapon(inventory, weapon, distance, target_infected) {
            Ok(pick) => return Ok(pick),
            Err(reason) => reasons.push(reason),
        }
    }
    if inventory.weapons().is_empty() {
        return Err(FireDecline::NoWeapon);
    }
    if !inventory.any_fireable() {
        return Err(FireDecline::NoAmmo);
    }
    Err([FireDecline::TargetInfected, FireDecline::TooClose]
        .into_iter()
        .find(|r| reasons.contains(r))
        .unwrap_or(FireDecline::OutOfRange))
}

/// Fire at `enemy_point` if the chosen weapon is able to.
///
/// The shot leaves along the line from the eye to `enemy_point`, perturbed
/// by the shared wobble and a uniform jitter whose half-width is the
/// skill-scaled spread. The commanded view does not steer the shot. A fired
/// shot consumes ammunition and starts the weapon's refire delay.
pub fn fire_weapon(
    enemy_point: Vec3,
    agent: &mut BotAgent,
    frame: &Frame<'_>,
    rng: &mut dyn RandomSource,
    request: FireRequest,
) -> FireOutcome {
    let Some(eye) = agent.eye_position() else {
        return FireOutcome::Declined(FireDecline::NotReady);
    };
    let distance = eye.distance(enemy_point);
    let infected = request
        .target
        .is_some_and(|target| frame.registry.is_infected(target));
    let chosen = request.weapon.map_or_else(
        || select_weapon(&agent.inventory, distance, infected),
        |weapon| check_weapon(&agent.inventory, weapon, distance, infected),
    );
    let weapon = match chosen {
        Ok(weapon) => weapon,
        Err(reason) => return FireOutcome::Declined(reason),
    };
    if frame.now - agent.last_fire_time < weapon.spec().refire {
        return FireOutcome::Declined(FireDecline::Cooldown);
    }
    if !agent.inventory.consume(weapon) {
        return FireOutcome::Declined(FireDecline::NoAmmo);
    }

    let spread = frame.skill.spread_degrees(agent.skill, &frame.config.aim);
    let wobble = frame.skill.wobble_for(agent.skill);
    let ideal = vec_to_angles(enemy_point - eye);
    let angles = ViewAngles::new(
        ideal.pitch + 0.5 * (rng.random_float(-spread, spread) + wobble.y),
        ideal.yaw + rng.random_float(-spread, spread) + wobble.x,
    )
    .normalized();
    let deviation = angle_between(angles.forward(), enemy_point - eye);

    agent.last_fire_time = frame.now;
    agent.scratch.chosen_weapon = Some(weapon);
    trace!(
        "{} fires {weapon:?}, {deviation:.2} degrees off at {distance:.0} units",
        agent.name
    );
    FireOutcome::Fired {
        weapon,
        angles,
        deviation,
    }
}

/// One rate-limited turn step from `view` towards `desired`.
///
/// Each axis closes `tracking_gain` of its error, capped at the turn rate
/// scaled by skill. Errors under half a degree close at once.
#[must_use]
pub fn turn_towards(
    view: ViewAngles,
    desired: ViewAngles,
    aim: &AimConfig,
    skill: f32,
    delta: f32,
) -> ViewAngles {
    let error = view.delta_to(desired);
    let cap = aim.max_turn_rate * delta.max(0.0) * (0.5 + 0.5 * skill.clamp(0.0, 1.0));
    let step = |e: f32| {
        if e.abs() <= SNAP_DEGREES {
            e
        } else {
            (e * aim.tracking_gain).clamp(-cap, cap)
        }
    };
    ViewAngles::new(view.pitch + step(error.pitch), view.yaw + step(error.yaw)).normalized()
}

/// Where to aim at `target` when shooting `weapon` from `eye`.
///
/// Projectiles are led along the target's observed velocity; explosives
/// are aimed at the feet.
#[must_use]
pub fn aim_point(eye: Vec3, target: &EnemyCandidate, weapon: Option<WeaponKind>) -> Vec3 {
    let Some(spec) = weapon.map(WeaponKind::spec) else {
        return target.position;
    };
    let mut point = target.position;
    if spec.projectile_speed > 0.0 {
        let flight = eye.distance(target.position) / spec.projectile_speed;
        point += target.velocity * flight;
    }
    if spec.danger == DangerTier::Explosive {
        point.z -= SPLASH_AIM_DROP;
    }
    point
}

/// Aim and shot taken against a target in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotReport {
    /// Angles to command this tick.
    pub aim: ViewAngles,
    /// Remaining error between the tracked view and the aim point.
    pub aim_error: f32,
    /// `None` when no shot was attempted.
    pub outcome: Option<FireOutcome>,
}

/// Track `target` and shoot when on target.
///
/// Shots are only attempted at visible targets. The weapon is planned from
/// the distance so that leading and the firing cone match the weapon that
/// would fire.
pub fn shoot_at_enemy(
    agent: &mut BotAgent,
    frame: &Frame<'_>,
    rng: &mut dyn RandomSource,
    target: &EnemyCandidate,
) -> ShotReport {
    let Some(eye) = agent.eye_position() else {
        return ShotReport {
            aim: agent.view,
            aim_error: 180.0,
            outcome: None,
        };
    };
    let infected = frame.registry.is_infected(target.handle);
    let planned = select_weapon(&agent.inventory, eye.distance(target.position), infected);
    let point = aim_point(eye, target, planned.ok());

    agent.view = turn_towards(
        agent.view,
        vec_to_angles(point - eye),
        &frame.config.aim,
        agent.skill,
        frame.delta,
    );
    let aim_error = angle_between(agent.view.forward(), point - eye);

    let outcome = if target.visible() {
        match planned {
            Err(reason) => Some(FireOutcome::Declined(reason)),
            Ok(weapon) if aim_error <= weapon.spec().cone => Some(fire_weapon(
                point,
                agent,
                frame,
                rng,
                FireRequest {
                    weapon: Some(weapon),
                    target: Some(target.handle),
                },
            )),
            Ok(_) => None,
        }
    } else {
        None
    };
    let aim = match outcome {
        Some(FireOutcome::Fired { angles, .. }) => angles,
        _ => agent.view,
    };
    ShotReport {
        aim,
        aim_error,
        outcome,
    }
}
