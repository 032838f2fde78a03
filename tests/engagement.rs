//! Shooting and grenade handling driven through a hand-built frame.

use approx::assert_relative_eq;
use fortbot::agent::BotAgent;
use fortbot::engage::grenade::{
    nade_handler, GrenadeKind, GrenadeSlot, NadeDecline, NadeRequest, NadeStatus,
};
use fortbot::engage::weapons::WeaponKind;
use fortbot::engage::{fire_weapon, FireDecline, FireOutcome, FireRequest};
use fortbot::frame::Frame;
use fortbot::perception::roster::CarrierRegistry;
use fortbot::skill::SkillInaccuracy;
use fortbot::{
    Arena, BotConfig, BotProfile, EntityHandle, PlayerClass, PlayerSnapshot, StdRandom, Team,
    ViewAngles, WorldQuery,
};
use glam::Vec3;
use rstest::{fixture, rstest};

struct Range {
    arena: Arena,
    bot: EntityHandle,
    registry: CarrierRegistry,
    skill: SkillInaccuracy,
    config: BotConfig,
}

impl Range {
    fn frame(&self, now: f32) -> Frame<'_> {
        Frame {
            world: &self.arena,
            rules: &self.arena,
            registry: &self.registry,
            skill: &self.skill,
            config: &self.config,
            now,
            delta: 0.05,
        }
    }

    fn agent(&self, skill: f32) -> BotAgent {
        let profile = BotProfile {
            name: "marksman".to_owned(),
            skill: Some(skill),
            team: Some(Team::Blue),
            class: Some(PlayerClass::Soldier),
        };
        let mut agent = BotAgent::new(self.bot, profile, 0.5);
        agent.me = self.arena.player(self.bot);
        agent
    }
}

#[fixture]
fn range() -> Range {
    let mut arena = Arena::new(2);
    let bot = arena.spawn(PlayerSnapshot::new(
        Team::Blue,
        PlayerClass::Soldier,
        Vec3::ZERO,
    ));
    arena.spawn(PlayerSnapshot::new(
        Team::Red,
        PlayerClass::Soldier,
        Vec3::X * 400.0,
    ));
    let config = BotConfig::default();
    Range {
        arena,
        bot,
        registry: CarrierRegistry::new(),
        skill: SkillInaccuracy::new(&config.skill),
        config,
    }
}

const TARGET: Vec3 = Vec3::new(400.0, 0.0, fortbot::EYE_HEIGHT);

fn mean_deviation(range: &Range, skill: f32, trials: u32) -> f32 {
    let mut agent = range.agent(skill);
    agent.inventory.set_ammo(WeaponKind::SuperShotgun, 10_000);
    let mut rng = StdRandom::seeded(42);
    let frame = range.frame(1.0);
    let mut total = 0.0;
    for _ in 0..trials {
        agent.last_fire_time = f32::NEG_INFINITY;
        let request = FireRequest {
            weapon: Some(WeaponKind::SuperShotgun),
            target: None,
        };
        match fire_weapon(TARGET, &mut agent, &frame, &mut rng, request) {
            FireOutcome::Fired { deviation, .. } => total += deviation,
            FireOutcome::Declined(reason) => panic!("shot declined: {reason:?}"),
        }
    }
    #[expect(clippy::cast_precision_loss, reason = "Trial counts are small.")]
    let mean = total / trials as f32;
    mean
}

#[rstest]
fn lower_skill_scatters_more(range: Range) {
    let sharp = mean_deviation(&range, 1.0, 200);
    let clumsy = mean_deviation(&range, 0.0, 200);
    assert!(sharp < 1.0, "sharp mean {sharp}");
    assert!(clumsy > 3.0 * sharp, "clumsy {clumsy} vs sharp {sharp}");
}

#[rstest]
fn shots_follow_the_target_not_the_view(range: Range) {
    let mut agent = range.agent(1.0);
    agent.view = ViewAngles::new(0.0, 90.0);
    let mut rng = StdRandom::seeded(13);
    let request = FireRequest {
        weapon: Some(WeaponKind::SuperShotgun),
        target: None,
    };
    let outcome = fire_weapon(TARGET, &mut agent, &range.frame(1.0), &mut rng, request);
    let FireOutcome::Fired {
        angles, deviation, ..
    } = outcome
    else {
        panic!("shot declined: {outcome:?}");
    };
    assert!(deviation < 2.0, "deviation {deviation}");
    assert!(angles.yaw.abs() < 2.0, "yaw {}", angles.yaw);
    assert_relative_eq!(agent.view.yaw, 90.0);
}

#[rstest]
fn refire_delay_blocks_a_second_shot(range: Range) {
    let mut agent = range.agent(1.0);
    let mut rng = StdRandom::seeded(5);
    let request = FireRequest {
        weapon: Some(WeaponKind::RocketLauncher),
        target: None,
    };
    let first = fire_weapon(TARGET, &mut agent, &range.frame(1.0), &mut rng, request);
    assert!(first.fired());
    let rockets = agent.inventory.ammo(WeaponKind::RocketLauncher);

    let second = fire_weapon(TARGET, &mut agent, &range.frame(1.2), &mut rng, request);
    assert_eq!(second, FireOutcome::Declined(FireDecline::Cooldown));
    assert_eq!(agent.inventory.ammo(WeaponKind::RocketLauncher), rockets);

    let third = fire_weapon(TARGET, &mut agent, &range.frame(2.0), &mut rng, request);
    assert!(third.fired());
}

#[rstest]
fn uncarried_weapon_is_declined(range: Range) {
    let mut agent = range.agent(1.0);
    let mut rng = StdRandom::seeded(5);
    let request = FireRequest {
        weapon: Some(WeaponKind::SniperRifle),
        target: None,
    };
    let outcome = fire_weapon(TARGET, &mut agent, &range.frame(0.0), &mut rng, request);
    assert_eq!(outcome, FireOutcome::Declined(FireDecline::NoWeapon));
}

#[rstest]
fn timed_grenade_is_held_until_the_fuse_matches_the_flight(range: Range) {
    let mut agent = range.agent(1.0);
    let mut rng = StdRandom::seeded(8);
    let target = Vec3::X * 400.0;
    let request = NadeRequest {
        timed: true,
        hint: Some(GrenadeSlot::Primary),
    };

    let primed = nade_handler(&mut agent, &range.frame(0.0), &mut rng, request, target);
    assert_eq!(primed, NadeStatus::Primed(GrenadeKind::Frag));
    assert_eq!(agent.inventory.grenades(GrenadeSlot::Primary), 3);

    for now in [1.0, 2.0, 3.0] {
        let held = nade_handler(&mut agent, &range.frame(now), &mut rng, request, target);
        assert_eq!(held, NadeStatus::Held(GrenadeKind::Frag), "at {now}s");
    }

    let thrown = nade_handler(&mut agent, &range.frame(3.2), &mut rng, request, target);
    assert!(matches!(
        thrown,
        NadeStatus::Thrown {
            kind: GrenadeKind::Frag,
            ..
        }
    ));
    assert!(agent.primed.is_none());
    assert_eq!(agent.inventory.grenades(GrenadeSlot::Primary), 3);
}

#[rstest]
fn untimed_grenade_is_thrown_at_once(range: Range) {
    let mut agent = range.agent(1.0);
    let mut rng = StdRandom::seeded(8);
    let request = NadeRequest {
        timed: false,
        hint: Some(GrenadeSlot::Primary),
    };
    let status = nade_handler(&mut agent, &range.frame(0.0), &mut rng, request, Vec3::X * 400.0);
    let NadeStatus::Thrown { aim, .. } = status else {
        panic!("expected a throw, got {status:?}");
    };
    assert!(aim.pitch > 0.0 && aim.pitch < 45.0, "pitch {}", aim.pitch);
    assert!(aim.yaw.abs() < 1e-3);
}

#[rstest]
fn disabled_grenades_are_declined(mut range: Range) {
    range.config.think.grenades_enabled = false;
    let mut agent = range.agent(1.0);
    let mut rng = StdRandom::seeded(8);
    let status = nade_handler(
        &mut agent,
        &range.frame(0.0),
        &mut rng,
        NadeRequest::default(),
        Vec3::X * 400.0,
    );
    assert_eq!(status, NadeStatus::Declined(NadeDecline::Disabled));
    assert_eq!(agent.inventory.grenades(GrenadeSlot::Primary), 4);
}
