//! Guesswork about enemies the bot cannot currently see.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::agent::Sighting;
use crate::config::{GrenadeConfig, ThreatConfig};
use crate::entity::{EntityHandle, Team};
use crate::numeric::{count_to_f32, count_to_i64, index_from_draw};
use crate::random::RandomSource;
use crate::world::WorldQuery;

/// Estimate where the enemy last seen at `last` is now.
///
/// The sighting is extrapolated along its velocity for at most
/// `guess_max_extrapolation` seconds and then jittered in the horizontal
/// plane by a radius that grows with elapsed time. Returns `None` with no
/// sighting or once the sighting is older than the enemy memory window.
#[must_use]
pub fn guess_player_position(
    last: Option<&Sighting>,
    now: f32,
    config: &ThreatConfig,
    rng: &mut dyn RandomSource,
) -> Option<Vec3> {
    let sighting = last?;
    let elapsed = (now - sighting.time).max(0.0);
    if elapsed > config.enemy_memory_seconds {
        return None;
    }
    let carried = sighting.velocity * elapsed.min(config.guess_max_extrapolation);
    let radius = (elapsed * config.guess_uncertainty_per_second).min(config.guess_max_jitter);
    let jitter = if radius > 0.0 {
        Vec3::new(
            rng.random_float(-radius, radius),
            rng.random_float(-radius, radius),
            0.0,
        )
    } else {
        Vec3::ZERO
    };
    Some(sighting.position + carried + jitter)
}

fn reaches(world: &dyn WorldQuery, from: Vec3, to: Vec3, ignore: Option<EntityHandle>) -> bool {
    let trace = world.trace_line(from, to, ignore);
    !trace.blocked() || trace.hit.is_some()
}

/// Point to lob a grenade at so that it lands near `target`.
///
/// The target itself is used when the throw line reaches it. Otherwise
/// points on a ring around the target are sampled, starting from a random
/// bearing, and the first one both reachable from `eye` and in the open
/// towards the target is returned. Only world geometry blocks; a player in
/// the way still takes the blast. Returns `None` when the target is out of
/// throwing range or no sample qualifies.
#[must_use]
pub fn find_grenade_point(
    world: &dyn WorldQuery,
    bot: EntityHandle,
    eye: Vec3,
    target: Vec3,
    config: &GrenadeConfig,
    rng: &mut dyn RandomSource,
) -> Option<Vec3> {
    if eye.distance(target) > config.max_range + config.point_radius {
        return None;
    }
    if reaches(world, eye, target, Some(bot)) {
        return Some(target);
    }
    let samples = usize::try_from(config.point_samples).unwrap_or(1).max(1);
    let draw = rng.random_long(0, config.point_samples - 1);
    let start = index_from_draw(draw, samples).unwrap_or(0);
    (0..samples)
        .map(|step| {
            let bearing = count_to_f32((start + step) % samples) / count_to_f32(samples) * TAU;
            target + Vec3::new(bearing.cos(), bearing.sin(), 0.0) * config.point_radius
        })
        .find(|&point| {
            eye.distance(point) <= config.max_range
                && reaches(world, eye, point, Some(bot))
                && reaches(world, point, target, None)
        })
}

/// A random playable team other than `own`, among the first `team_count`.
///
/// Returns `None` when no such team exists.
#[must_use]
pub fn pick_random_enemy_team(
    own: Option<Team>,
    team_count: usize,
    rng: &mut dyn RandomSource,
) -> Option<Team> {
    let count = team_count.min(Team::PLAYABLE.len());
    let options: Vec<Team> = Team::PLAYABLE
        .iter()
        .take(count)
        .copied()
        .filter(|&t| Some(t) != own)
        .collect();
    if options.is_empty() {
        return None;
    }
    let last = count_to_i64(options.len()) - 1;
    let index = index_from_draw(rng.random_long(0, last), options.len())?;
    options.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{MockRandomSource, ScriptedRandom};
    use crate::world::{MockWorldQuery, TraceResult};
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn sighting(time: f32) -> Sighting {
        Sighting {
            position: Vec3::new(100.0, 0.0, 0.0),
            velocity: Vec3::new(50.0, 0.0, 0.0),
            time,
        }
    }

    #[test]
    fn nothing_known_means_no_estimate() {
        let mut rng = ScriptedRandom::midpoint();
        assert_eq!(
            guess_player_position(None, 1.0, &ThreatConfig::default(), &mut rng),
            None
        );
    }

    #[test]
    fn stale_sighting_means_no_estimate() {
        let config = ThreatConfig::default();
        let mut rng = ScriptedRandom::midpoint();
        let old = sighting(0.0);
        let now = config.enemy_memory_seconds + 0.5;
        assert_eq!(guess_player_position(Some(&old), now, &config, &mut rng), None);
    }

    #[test]
    fn fresh_sighting_is_extrapolated() {
        let config = ThreatConfig::default();
        let mut rng = ScriptedRandom::midpoint();
        let seen = sighting(1.0);
        let guess = guess_player_position(Some(&seen), 1.5, &config, &mut rng)
            .expect("fresh sighting yields a guess");
        assert_relative_eq!(guess.x, 125.0, epsilon = 1e-3);
        assert_relative_eq!(guess.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn jitter_is_bounded_by_elapsed_time() {
        let config = ThreatConfig::default();
        let seen = Sighting {
            velocity: Vec3::ZERO,
            ..sighting(0.0)
        };
        let mut rng = ScriptedRandom::new([1.0]);
        let guess = guess_player_position(Some(&seen), 1.0, &config, &mut rng)
            .expect("fresh sighting yields a guess");
        let bound = config.guess_uncertainty_per_second;
        assert!((guess.x - seen.position.x).abs() <= bound + 1e-3);
        assert!((guess.y - seen.position.y).abs() <= bound + 1e-3);
    }

    #[test]
    fn visible_target_is_its_own_grenade_point() {
        let mut world = MockWorldQuery::new();
        world.expect_trace_line().returning(|_, _, _| TraceResult::CLEAR);
        let mut rng = MockRandomSource::new();
        rng.expect_random_long().never();
        let target = Vec3::new(300.0, 0.0, 0.0);
        let point = find_grenade_point(
            &world,
            EntityHandle::new(1, 0),
            Vec3::ZERO,
            target,
            &GrenadeConfig::default(),
            &mut rng,
        );
        assert_eq!(point, Some(target));
    }

    #[test]
    fn out_of_range_target_has_no_point() {
        let world = MockWorldQuery::new();
        let mut rng = ScriptedRandom::midpoint();
        let point = find_grenade_point(
            &world,
            EntityHandle::new(1, 0),
            Vec3::ZERO,
            Vec3::X * 5000.0,
            &GrenadeConfig::default(),
            &mut rng,
        );
        assert_eq!(point, None);
    }

    #[rstest]
    #[case::two_teams(Some(Team::Blue), 2, Some(Team::Red))]
    #[case::no_opponents(Some(Team::Blue), 1, None)]
    #[case::spectator_sees_everyone(Some(Team::Spectator), 1, Some(Team::Blue))]
    fn picks_enemy_team(
        #[case] own: Option<Team>,
        #[case] team_count: usize,
        #[case] expected: Option<Team>,
    ) {
        let mut rng = ScriptedRandom::midpoint();
        assert_eq!(pick_random_enemy_team(own, team_count, &mut rng), expected);
    }

    #[test]
    fn never_picks_own_team() {
        let mut rng = crate::random::StdRandom::seeded(3);
        for _ in 0..200 {
            let team = pick_random_enemy_team(Some(Team::Yellow), 4, &mut rng);
            assert!(matches!(team, Some(t) if t != Team::Yellow && t.is_playable()));
        }
    }
}
