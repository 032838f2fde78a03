//! Threat scoring.
//!
//! A candidate's score is the sum of a weapon term, a proximity term, a
//! facing term and a carrier bonus, clamped to `0..=MAX_THREAT_SCORE`.

use glam::Vec3;

use crate::agent::BotAgent;
use crate::config::ThreatConfig;
use crate::engage::weapons::DangerTier;
use crate::entity::PlayerSnapshot;
use crate::numeric::clamp_score;
use crate::perception::view_angle_diff;
use crate::MAX_THREAT_SCORE;

const PROXIMITY_WEIGHT: f32 = 30.0;
const AIMED_AT_ANGLE: f32 = 15.0;
const AIMED_AT_BONUS: f32 = 20.0;
const FACING_ANGLE: f32 = 45.0;
const FACING_BONUS: f32 = 10.0;
const CARRIER_BONUS: f32 = 25.0;
const UNARMED_WEIGHT: f32 = 5.0;
/// Melee beyond this distance only counts for a fraction of its weight.
const MELEE_REACH: f32 = 128.0;
const DISTANT_MELEE_FACTOR: f32 = 0.3;
const CROWD_BONUS: u32 = 5;

/// Inputs to a single threat score.
#[derive(Debug, Clone, Copy)]
pub struct ThreatInputs<'a> {
    /// Eye position of the bot doing the scoring.
    pub observer_eye: Vec3,
    /// What the host reports about the enemy.
    pub enemy: &'a PlayerSnapshot,
    /// Where the bot believes the enemy is.
    pub position: Vec3,
    /// Whether the enemy is in sight; the facing term needs sight.
    pub visible: bool,
    /// Whether the enemy holds an objective.
    pub carrier: bool,
}

/// Score how dangerous one enemy is to the observer.
#[must_use]
pub fn threat_score(inputs: &ThreatInputs<'_>, config: &ThreatConfig) -> u32 {
    let distance = inputs.observer_eye.distance(inputs.position);

    let weapon = inputs.enemy.weapon.map(|w| w.spec());
    let mut weapon_term = weapon.map_or(UNARMED_WEIGHT, |spec| spec.danger.weight());
    if weapon.is_some_and(|spec| spec.danger == DangerTier::Melee) && distance > MELEE_REACH {
        weapon_term *= DISTANT_MELEE_FACTOR;
    }

    let proximity =
        PROXIMITY_WEIGHT * (1.0 - distance / config.max_engage_distance).clamp(0.0, 1.0);

    let facing = if inputs.visible {
        let diff = view_angle_diff(
            inputs.enemy.eye_position(),
            inputs.enemy.view,
            inputs.observer_eye,
        );
        if diff <= AIMED_AT_ANGLE {
            AIMED_AT_BONUS
        } else if diff <= FACING_ANGLE {
            FACING_BONUS
        } else {
            0.0
        }
    } else {
        0.0
    };

    let carrier = if inputs.carrier { CARRIER_BONUS } else { 0.0 };
    clamp_score(weapon_term + proximity + facing + carrier, MAX_THREAT_SCORE)
}

/// Aggregate threat the agent faces this tick.
///
/// The highest candidate score plus a small bonus per additional candidate,
/// clamped to the score range. Zero with no candidates.
#[must_use]
pub fn assess_threat_level(agent: &BotAgent) -> u32 {
    let candidates = &agent.scratch.candidates;
    let Some(peak) = candidates.iter().map(|c| c.threat).max() else {
        return 0;
    };
    let extra = u32::try_from(candidates.len().saturating_sub(1)).unwrap_or(u32::MAX);
    peak.saturating_add(CROWD_BONUS.saturating_mul(extra)).min(MAX_THREAT_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engage::weapons::WeaponKind;
    use crate::entity::{PlayerClass, Team};
    use crate::vector_math::ViewAngles;

    fn enemy_at(origin: Vec3, yaw: f32, weapon: WeaponKind) -> PlayerSnapshot {
        let mut enemy = PlayerSnapshot::new(Team::Red, PlayerClass::Soldier, origin);
        enemy.view = ViewAngles::new(0.0, yaw);
        enemy.weapon = Some(weapon);
        enemy
    }

    fn score(enemy: &PlayerSnapshot, visible: bool, carrier: bool) -> u32 {
        let inputs = ThreatInputs {
            observer_eye: Vec3::new(0.0, 0.0, crate::EYE_HEIGHT),
            enemy,
            position: enemy.origin,
            visible,
            carrier,
        };
        threat_score(&inputs, &ThreatConfig::default())
    }

    #[test]
    fn aiming_enemy_is_more_dangerous() {
        let facing = enemy_at(Vec3::X * 500.0, 180.0, WeaponKind::RocketLauncher);
        let turned = enemy_at(Vec3::X * 500.0, 0.0, WeaponKind::RocketLauncher);
        assert!(score(&facing, true, false) > score(&turned, true, false));
    }

    #[test]
    fn carrier_adds_bonus() {
        let enemy = enemy_at(Vec3::X * 800.0, 0.0, WeaponKind::Shotgun);
        assert!(score(&enemy, true, true) > score(&enemy, true, false));
    }

    #[test]
    fn score_never_exceeds_maximum() {
        let enemy = enemy_at(Vec3::X * 10.0, 180.0, WeaponKind::RocketLauncher);
        assert!(score(&enemy, true, true) <= MAX_THREAT_SCORE);
    }

    #[test]
    fn distant_knife_barely_registers() {
        let knife = enemy_at(Vec3::X * 1500.0, 0.0, WeaponKind::Knife);
        let cannon = enemy_at(Vec3::X * 1500.0, 0.0, WeaponKind::AssaultCannon);
        assert!(score(&knife, true, false) < score(&cannon, true, false));
    }
}
