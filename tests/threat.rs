//! Target arbitration and the memory of unseen enemies.

use approx::assert_relative_eq;
use fortbot::agent::Sighting;
use fortbot::config::ThreatConfig;
use fortbot::threat::guess::guess_player_position;
use fortbot::threat::multigun::select_target;
use fortbot::threat::{Awareness, EnemyCandidate};
use fortbot::{EntityHandle, IdleSeeker, StdRandom};
use glam::Vec3;
use rstest::rstest;
use test_utils::{no_grenades, scripted, Duel};

fn candidate(index: u32, awareness: Awareness, threat: u32, distance: f32) -> EnemyCandidate {
    EnemyCandidate {
        handle: EntityHandle::new(index, 0),
        awareness,
        position: Vec3::X * distance,
        velocity: Vec3::ZERO,
        distance_sq: distance * distance,
        threat,
        carrier: false,
    }
}

fn permutations(items: &[EnemyCandidate]) -> Vec<Vec<EnemyCandidate>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for (i, head) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

#[rstest]
#[case::gap_then_distance(
    [(80, 500.0), (70, 100.0), (30, 50.0)],
    2
)]
#[case::nearest_is_outclassed(
    [(50, 100.0), (60, 200.0), (70, 300.0)],
    2
)]
#[case::standout_threat(
    [(40, 100.0), (90, 800.0), (50, 200.0)],
    2
)]
fn selection_does_not_depend_on_order(#[case] pool: [(u32, f32); 3], #[case] expected: u32) {
    let margin = ThreatConfig::default().multigun_margin;
    let candidates: Vec<_> = (1..)
        .zip(pool)
        .map(|(index, (threat, distance))| candidate(index, Awareness::Visible, threat, distance))
        .collect();
    for order in permutations(&candidates) {
        let pick = select_target(&order, margin).map(|c| c.handle);
        assert_eq!(pick, Some(EntityHandle::new(expected, 0)), "order {order:?}");
    }
}

#[test]
fn sight_beats_hearing() {
    let candidates = [
        candidate(1, Awareness::Heard, 90, 50.0),
        candidate(2, Awareness::Visible, 20, 900.0),
        candidate(3, Awareness::Remembered, 95, 40.0),
    ];
    let pick = select_target(&candidates, 15).map(|c| c.handle);
    assert_eq!(pick, Some(EntityHandle::new(2, 0)));
}

#[test]
fn no_candidates_no_target() {
    assert!(select_target(&[], 15).is_none());
}

#[rstest]
#[case::never_seen(None, 1.0)]
#[case::forgotten(Some(0.0), 10.0)]
fn guesses_need_a_recent_sighting(#[case] seen_at: Option<f32>, #[case] now: f32) {
    let sighting = seen_at.map(|time| Sighting {
        position: Vec3::ZERO,
        velocity: Vec3::X * 100.0,
        time,
    });
    let mut rng = StdRandom::seeded(1);
    let guess = guess_player_position(sighting.as_ref(), now, &ThreatConfig::default(), &mut rng);
    assert_eq!(guess, None);
}

#[test]
fn guess_extrapolates_at_most_one_second() {
    let sighting = Sighting {
        position: Vec3::ZERO,
        velocity: Vec3::X * 100.0,
        time: 0.0,
    };
    // Draws at the midpoint leave the jitter at zero.
    let mut rng = scripted(&[0.5]);
    let guess = guess_player_position(Some(&sighting), 2.0, &ThreatConfig::default(), &mut rng)
        .unwrap_or(Vec3::NAN);
    assert_relative_eq!(guess.x, 100.0, epsilon = 1e-3);
    assert_relative_eq!(guess.y, 0.0, epsilon = 1e-3);
}

#[test]
fn removed_enemy_is_forgotten() {
    let mut duel = Duel::new(no_grenades(), 1.0, 400.0, 3);
    let mut seeker = IdleSeeker;
    let first = Duel::report(&duel.step(0.05, &mut seeker));
    assert_eq!(first.target, Some(duel.enemy));
    assert!(duel.agent().enemy.is_some());

    duel.arena.remove(duel.enemy);
    let second = Duel::report(&duel.step(0.05, &mut seeker));
    assert_eq!(second.target, None);
    assert_eq!(second.threat, 0);
    assert!(duel.agent().enemy.is_none());
    assert!(second.sought_item);
}

#[test]
fn hidden_enemy_is_chased_from_memory_until_it_fades() {
    let mut duel = Duel::new(no_grenades(), 1.0, 400.0, 5);
    let mut seeker = IdleSeeker;
    let sighted = Duel::report(&duel.step(0.05, &mut seeker));
    assert_eq!(sighted.target, Some(duel.enemy));

    duel.arena
        .add_wall(Vec3::new(190.0, -50.0, -10.0), Vec3::new(210.0, 50.0, 200.0));
    for _ in 0..10 {
        let hidden = Duel::report(&duel.step(0.5, &mut seeker));
        assert_eq!(hidden.target, Some(duel.enemy), "at {}s", duel.now);
        assert!(hidden.shot.is_none());
        assert!(!hidden.command.fire);
        let awareness = duel.agent().scratch.candidates.first().map(|c| c.awareness);
        assert_eq!(awareness, Some(Awareness::Remembered));
    }

    let faded = Duel::report(&duel.step(0.5, &mut seeker));
    assert_eq!(faded.target, None);
    assert!(duel.agent().enemy.is_none());
    assert!(faded.sought_item);
}
