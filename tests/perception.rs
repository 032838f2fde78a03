//! Sight, team rosters and the carrier registry against the reference arena.

use fortbot::config::PerceptionConfig;
use fortbot::perception::roster::{
    friendly_class_total, team_class_total, team_color_check, CarrierRegistry,
};
use fortbot::perception::{can_see_origin, in_field_of_view, visible_point_of, FieldOfView};
use fortbot::{Arena, PlayerClass, PlayerSnapshot, Team, ViewAngles, WorldQuery};
use glam::Vec3;
use rstest::rstest;

fn player(team: Team, class: PlayerClass, origin: Vec3) -> PlayerSnapshot {
    PlayerSnapshot::new(team, class, origin)
}

#[rstest]
#[case::dead_ahead(Vec3::new(500.0, 0.0, 0.0), FieldOfView::Focus)]
#[case::off_to_the_side(Vec3::new(500.0, 400.0, 0.0), FieldOfView::Peripheral)]
#[case::behind(Vec3::new(-500.0, 0.0, 0.0), FieldOfView::Outside)]
#[case::straight_up(Vec3::new(0.0, 0.0, 500.0), FieldOfView::Outside)]
fn view_cone_classification(#[case] dest: Vec3, #[case] expected: FieldOfView) {
    let fov = in_field_of_view(
        ViewAngles::default(),
        Vec3::ZERO,
        dest,
        &PerceptionConfig::default(),
    );
    assert_eq!(fov, expected);
}

#[test]
fn cone_boundary_is_inclusive() {
    let config = PerceptionConfig::default();
    let edge = ViewAngles::new(0.0, config.fov_half_angle_h).forward() * 300.0;
    let fov = in_field_of_view(ViewAngles::default(), Vec3::ZERO, edge, &config);
    assert!(fov.contains());
}

#[test]
fn low_wall_hides_the_body_but_not_the_head() {
    let mut arena = Arena::new(2);
    let bot = arena.spawn(player(Team::Blue, PlayerClass::Soldier, Vec3::ZERO));
    let enemy = arena.spawn(player(Team::Red, PlayerClass::Soldier, Vec3::X * 400.0));
    arena.add_wall(Vec3::new(190.0, -50.0, -10.0), Vec3::new(210.0, 50.0, 20.0));
    let eye = Vec3::Z * fortbot::EYE_HEIGHT;

    assert!(!can_see_origin(&arena, bot, eye, Vec3::new(400.0, 0.0, 0.0)));
    let seen = visible_point_of(&arena, bot, eye, enemy);
    assert_eq!(seen, Some(Vec3::new(400.0, 0.0, fortbot::EYE_HEIGHT)));
}

#[test]
fn full_wall_hides_the_enemy() {
    let mut arena = Arena::new(2);
    let bot = arena.spawn(player(Team::Blue, PlayerClass::Soldier, Vec3::ZERO));
    let enemy = arena.spawn(player(Team::Red, PlayerClass::Soldier, Vec3::X * 400.0));
    arena.add_wall(Vec3::new(190.0, -50.0, -10.0), Vec3::new(210.0, 50.0, 200.0));
    let eye = Vec3::Z * fortbot::EYE_HEIGHT;
    assert_eq!(visible_point_of(&arena, bot, eye, enemy), None);
}

#[test]
fn stale_handles_resolve_to_nothing() {
    let mut arena = Arena::new(2);
    let bot = arena.spawn(player(Team::Blue, PlayerClass::Soldier, Vec3::ZERO));
    let enemy = arena.spawn(player(Team::Red, PlayerClass::Medic, Vec3::X * 300.0));
    assert!(arena.remove(enemy).is_some());

    assert_eq!(team_color_check(&arena, enemy), None);
    assert_eq!(friendly_class_total(&arena, enemy, PlayerClass::Medic, false), 0);
    assert_eq!(visible_point_of(&arena, bot, Vec3::ZERO, enemy), None);
    assert!(!arena.entity_is_valid(enemy));
}

#[rstest]
#[case::counting_self(false, 2)]
#[case::ignoring_self(true, 1)]
fn friendly_class_counts(#[case] ignore_self: bool, #[case] expected: usize) {
    let mut arena = Arena::new(2);
    let me = arena.spawn(player(Team::Blue, PlayerClass::Soldier, Vec3::ZERO));
    arena.spawn(player(Team::Blue, PlayerClass::Soldier, Vec3::Y * 100.0));
    let mut fallen = player(Team::Blue, PlayerClass::Soldier, Vec3::Y * 200.0);
    fallen.alive = false;
    arena.spawn(fallen);
    arena.spawn(player(Team::Blue, PlayerClass::Medic, Vec3::Y * 300.0));
    arena.spawn(player(Team::Red, PlayerClass::Soldier, Vec3::X * 900.0));

    assert_eq!(
        friendly_class_total(&arena, me, PlayerClass::Soldier, ignore_self),
        expected
    );
}

#[test]
fn fallen_teammates_leave_the_class_open() {
    let mut arena = Arena::new(2);
    let me = arena.spawn(player(Team::Blue, PlayerClass::Medic, Vec3::ZERO));
    let mut fallen = player(Team::Blue, PlayerClass::Soldier, Vec3::Y * 100.0);
    fallen.alive = false;
    arena.spawn(fallen);

    assert_eq!(friendly_class_total(&arena, me, PlayerClass::Soldier, true), 0);
    assert_eq!(friendly_class_total(&arena, me, PlayerClass::Medic, true), 0);
    assert_eq!(friendly_class_total(&arena, me, PlayerClass::Medic, false), 1);
    assert_eq!(
        team_class_total(&arena, Team::Blue, PlayerClass::Soldier, Some(me)),
        1
    );
}

#[test]
fn registry_follows_the_rules_engine() {
    let mut arena = Arena::new(2);
    let first = arena.spawn(player(Team::Red, PlayerClass::Scout, Vec3::ZERO));
    let second = arena.spawn(player(Team::Red, PlayerClass::Scout, Vec3::X * 64.0));
    arena.give_objective(first);
    arena.give_objective(second);
    arena.infect(second);

    let mut registry = CarrierRegistry::new();
    registry.update(&arena, &arena);
    assert_eq!(registry.carriers(), &[first]);
    assert!(registry.is_infected(second));

    arena.remove(first);
    registry.update(&arena, &arena);
    assert_eq!(registry.carriers(), &[second]);
    assert!(!registry.has_flag(first));
}

#[test]
fn extra_objective_slots_admit_more_carriers() {
    let mut arena = Arena::new(2);
    let first = arena.spawn(player(Team::Red, PlayerClass::Scout, Vec3::ZERO));
    let second = arena.spawn(player(Team::Red, PlayerClass::Scout, Vec3::X * 64.0));
    arena.set_objective_slots(2);
    arena.give_objective(first);
    arena.give_objective(second);

    let mut registry = CarrierRegistry::new();
    registry.update(&arena, &arena);
    assert_eq!(registry.carriers(), &[first, second]);
    assert!(registry.has_flag(second));
}
