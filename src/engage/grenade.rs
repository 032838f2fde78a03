//! Grenade selection, priming and throwing.
//!
//! A timed grenade is primed and held until its remaining fuse matches the
//! flight time to the target, so that it bursts on arrival. An untimed
//! grenade is primed and thrown in the same tick. A held grenade is always
//! thrown before the remaining fuse drops below the safety margin.

use glam::Vec3;
use log::debug;

use crate::agent::{BotAgent, Inventory, PrimedGrenade};
use crate::config::GrenadeConfig;
use crate::entity::PlayerClass;
use crate::frame::Frame;
use crate::numeric::{count_to_i64, index_from_draw};
use crate::random::RandomSource;
use crate::threat::guess::find_grenade_point;
use crate::vector_math::{length_2d, vec_to_angles, ViewAngles};

const GRAVITY: f32 = 800.0;
const CONCUSSION_RANGE: f32 = 500.0;
const CALTROP_RANGE: f32 = 200.0;

/// Grenade pouch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrenadeSlot {
    /// Main pouch; frags for most classes.
    Primary,
    /// Class-specific special grenades.
    Secondary,
}

impl GrenadeSlot {
    /// Both pouches in preference order.
    pub const ALL: [Self; 2] = [Self::Primary, Self::Secondary];

    /// Grenades issued to this slot on spawn.
    #[must_use]
    pub const fn spawn_count(self) -> u32 {
        match self {
            Self::Primary => 4,
            Self::Secondary => 2,
        }
    }
}

/// Grenade type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrenadeKind {
    /// Plain explosive.
    Frag,
    /// Knockback without damage.
    Concussion,
    /// Spins and sprays nails.
    Nail,
    /// Splits into bomblets.
    Mirv,
    /// Sets the area alight.
    Napalm,
    /// Hallucinogenic cloud.
    Gas,
    /// Detonates nearby ammunition.
    Emp,
    /// Scatters caltrops on the floor.
    Caltrop,
}

impl GrenadeKind {
    /// Type a `class` carries in `slot`, if any.
    #[must_use]
    pub const fn for_slot(class: PlayerClass, slot: GrenadeSlot) -> Option<Self> {
        use PlayerClass as C;
        match (class, slot) {
            (C::Civilian, _) | (C::Sniper, GrenadeSlot::Secondary) => None,
            (C::Scout, GrenadeSlot::Primary) => Some(Self::Caltrop),
            (_, GrenadeSlot::Primary) => Some(Self::Frag),
            (C::Scout | C::Medic, GrenadeSlot::Secondary) => Some(Self::Concussion),
            (C::Soldier, GrenadeSlot::Secondary) => Some(Self::Nail),
            (C::Demoman | C::Heavy, GrenadeSlot::Secondary) => Some(Self::Mirv),
            (C::Pyro, GrenadeSlot::Secondary) => Some(Self::Napalm),
            (C::Spy, GrenadeSlot::Secondary) => Some(Self::Gas),
            (C::Engineer, GrenadeSlot::Secondary) => Some(Self::Emp),
        }
    }

    /// Distances, inclusive, at which this type is worth throwing.
    #[must_use]
    pub fn range_band(self, config: &GrenadeConfig) -> (f32, f32) {
        match self {
            Self::Concussion => (0.0, CONCUSSION_RANGE.min(config.max_range)),
            Self::Caltrop => (0.0, CALTROP_RANGE.min(config.max_range)),
            _ => (config.min_range, config.max_range),
        }
    }

    /// Whether `distance` lies within [`GrenadeKind::range_band`].
    #[must_use]
    pub fn suits(self, distance: f32, config: &GrenadeConfig) -> bool {
        let (low, high) = self.range_band(config);
        (low..=high).contains(&distance)
    }
}

/// How a grenade request should be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NadeRequest {
    /// Hold the primed grenade so it bursts on arrival.
    pub timed: bool,
    /// Preferred slot; the handler may override it when the type does not
    /// suit the distance.
    pub hint: Option<GrenadeSlot>,
}

/// Why no grenade was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NadeDecline {
    /// Grenades are switched off in the configuration.
    Disabled,
    /// The bot has no snapshot of itself this tick.
    NotReady,
    /// Both pouches are empty or unusable for the class.
    NoGrenades,
    /// No point near the target can be reached by a throw.
    NoThrowPoint,
    /// No carried type suits the throw distance.
    OutOfRange,
}

/// Result of one call to [`nade_handler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NadeStatus {
    /// A timed grenade was just primed and is being held.
    Primed(GrenadeKind),
    /// A held grenade is still cooking.
    Held(GrenadeKind),
    /// The grenade left the hand this tick.
    Thrown {
        /// Grenade thrown.
        kind: GrenadeKind,
        /// Launch direction.
        aim: ViewAngles,
    },
    /// Nothing was primed or thrown.
    Declined(NadeDecline),
}

/// Launch angles that carry a grenade thrown at `speed` from `eye` to `target`.
///
/// Uses the flatter ballistic solution; a target beyond reach gets a
/// 45-degree lob.
#[must_use]
pub fn throw_angles(eye: Vec3, target: Vec3, speed: f32) -> ViewAngles {
    let offset = target - eye;
    let yaw = vec_to_angles(offset).yaw;
    let horizontal = length_2d(offset);
    if horizontal <= f32::EPSILON {
        return ViewAngles::new(if offset.z >= 0.0 { 89.0 } else { -89.0 }, yaw);
    }
    let v2 = speed * speed;
    let discriminant = v2 * v2 - GRAVITY * (GRAVITY * horizontal * horizontal + 2.0 * offset.z * v2);
    let pitch = if discriminant < 0.0 {
        45.0
    } else {
        ((v2 - discriminant.sqrt()) / (GRAVITY * horizontal))
            .atan()
            .to_degrees()
    };
    ViewAngles::new(pitch, yaw).normalized()
}

fn choose_grenade(
    class: PlayerClass,
    inventory: &Inventory,
    hint: Option<GrenadeSlot>,
    distance: f32,
    config: &GrenadeConfig,
    rng: &mut dyn RandomSource,
) -> Result<(GrenadeSlot, GrenadeKind), NadeDecline> {
    let stocked: Vec<(GrenadeSlot, GrenadeKind)> = GrenadeSlot::ALL
        .iter()
        .filter(|&&slot| inventory.grenades(slot) > 0)
        .filter_map(|&slot| GrenadeKind::for_slot(class, slot).map(|kind| (slot, kind)))
        .collect();
    if stocked.is_empty() {
        return Err(NadeDecline::NoGrenades);
    }
    let suitable: Vec<(GrenadeSlot, GrenadeKind)> = stocked
        .into_iter()
        .filter(|(_, kind)| kind.suits(distance, config))
        .collect();
    if let Some(&pick) = hint.and_then(|slot| suitable.iter().find(|(s, _)| *s == slot)) {
        return Ok(pick);
    }
    if hint.is_some() || suitable.len() < 2 {
        return suitable.first().copied().ok_or(NadeDecline::OutOfRange);
    }
    let draw = rng.random_long(0, count_to_i64(suitable.len()) - 1);
    index_from_draw(draw, suitable.len())
        .and_then(|i| suitable.get(i).copied())
        .ok_or(NadeDecline::OutOfRange)
}

/// Prime, hold or throw a grenade at `target`.
///
/// With a grenade already held, only its timing is managed: the throw goes
/// at the refreshed `target` once the remaining fuse is no longer than the
/// flight time, or has reached the safety margin. Otherwise a throw point is
/// found, a type is chosen (the request's slot hint is honoured only when
/// its type suits the distance; without a hint a suitable type is picked at
/// random), one grenade is taken from inventory and it is either held
/// (timed) or thrown at once.
pub fn nade_handler(
    agent: &mut BotAgent,
    frame: &Frame<'_>,
    rng: &mut dyn RandomSource,
    request: NadeRequest,
    target: Vec3,
) -> NadeStatus {
    let Some(eye) = agent.eye_position() else {
        return NadeStatus::Declined(NadeDecline::NotReady);
    };
    let config = &frame.config.grenade;

    if let Some(mut primed) = agent.primed {
        primed.target = target;
        let remaining = config.fuse_seconds - (frame.now - primed.primed_at);
        let flight = eye.distance(primed.target) / config.throw_speed;
        if !primed.timed || remaining <= flight || remaining <= config.safety_margin {
            agent.primed = None;
            debug!(
                "{} throws {:?} with {remaining:.2}s of fuse left",
                agent.name, primed.kind
            );
            return NadeStatus::Thrown {
                kind: primed.kind,
                aim: throw_angles(eye, primed.target, config.throw_speed),
            };
        }
        agent.primed = Some(primed);
        return NadeStatus::Held(primed.kind);
    }

    if !frame.config.think.grenades_enabled {
        return NadeStatus::Declined(NadeDecline::Disabled);
    }
    let Some(point) = find_grenade_point(frame.world, agent.handle, eye, target, config, rng)
    else {
        return NadeStatus::Declined(NadeDecline::NoThrowPoint);
    };
    let distance = eye.distance(point);
    let (slot, kind) =
        match choose_grenade(agent.class, &agent.inventory, request.hint, distance, config, rng) {
            Ok(choice) => choice,
            Err(decline) => return NadeStatus::Declined(decline),
        };
    if !agent.inventory.take_grenade(slot) {
        return NadeStatus::Declined(NadeDecline::NoGrenades);
    }
    agent.scratch.chosen_grenade = Some(kind);

    let flight = distance / config.throw_speed;
    let worth_holding = config.fuse_seconds - flight > config.safety_margin;
    if request.timed && worth_holding {
        debug!("{} primes {kind:?} for a target {distance:.0} away", agent.name);
        agent.primed = Some(PrimedGrenade {
            kind,
            primed_at: frame.now,
            target: point,
            timed: true,
        });
        NadeStatus::Primed(kind)
    } else {
        debug!("{} throws {kind:?} at once", agent.name);
        NadeStatus::Thrown {
            kind,
            aim: throw_angles(eye, point, config.throw_speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{MockRandomSource, ScriptedRandom};
    use rstest::rstest;

    #[rstest]
    #[case::civilian(PlayerClass::Civilian, GrenadeSlot::Primary, None)]
    #[case::sniper_secondary(PlayerClass::Sniper, GrenadeSlot::Secondary, None)]
    #[case::scout_primary(PlayerClass::Scout, GrenadeSlot::Primary, Some(GrenadeKind::Caltrop))]
    #[case::soldier_primary(PlayerClass::Soldier, GrenadeSlot::Primary, Some(GrenadeKind::Frag))]
    #[case::demoman_secondary(PlayerClass::Demoman, GrenadeSlot::Secondary, Some(GrenadeKind::Mirv))]
    fn class_pouches(
        #[case] class: PlayerClass,
        #[case] slot: GrenadeSlot,
        #[case] expected: Option<GrenadeKind>,
    ) {
        assert_eq!(GrenadeKind::for_slot(class, slot), expected);
    }

    #[test]
    fn unsuitable_hint_is_overridden() {
        let config = GrenadeConfig::default();
        let inventory = Inventory::for_class(PlayerClass::Medic);
        let mut rng = ScriptedRandom::midpoint();
        // Concussion only reaches so far; the frag takes over.
        let choice = choose_grenade(
            PlayerClass::Medic,
            &inventory,
            Some(GrenadeSlot::Secondary),
            700.0,
            &config,
            &mut rng,
        );
        assert_eq!(choice, Ok((GrenadeSlot::Primary, GrenadeKind::Frag)));
    }

    #[test]
    fn suitable_hint_is_honoured_without_a_draw() {
        let config = GrenadeConfig::default();
        let inventory = Inventory::for_class(PlayerClass::Medic);
        let mut rng = MockRandomSource::new();
        rng.expect_random_long().never();
        let choice = choose_grenade(
            PlayerClass::Medic,
            &inventory,
            Some(GrenadeSlot::Secondary),
            300.0,
            &config,
            &mut rng,
        );
        assert_eq!(choice, Ok((GrenadeSlot::Secondary, GrenadeKind::Concussion)));
    }

    #[test]
    fn empty_pouches_decline() {
        let config = GrenadeConfig::default();
        let mut inventory = Inventory::for_class(PlayerClass::Soldier);
        inventory.set_grenades(GrenadeSlot::Primary, 0);
        inventory.set_grenades(GrenadeSlot::Secondary, 0);
        let mut rng = ScriptedRandom::midpoint();
        let choice = choose_grenade(PlayerClass::Soldier, &inventory, None, 400.0, &config, &mut rng);
        assert_eq!(choice, Err(NadeDecline::NoGrenades));
    }

    #[test]
    fn far_throws_are_lobbed_upwards() {
        let near = throw_angles(Vec3::ZERO, Vec3::X * 200.0, 600.0);
        let far = throw_angles(Vec3::ZERO, Vec3::X * 400.0, 600.0);
        assert!(near.pitch > 0.0);
        assert!(far.pitch > near.pitch);
    }
}
