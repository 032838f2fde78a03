//! The per-frame decision cycle for one bot.
//!
//! ```text
//! Spawning --alive--> spawn_init --> Idle
//! Idle / Seeking / Engaging --enemy_check--> Engaging   (threat >= minimum)
//!                                       \--> Seeking    (nothing worth fighting)
//! any --dead or removed--> Spawning
//! ```
//!
//! Each tick issues at most one fire or throw action.

use log::{debug, info, trace};

use crate::agent::{BotAgent, BotState, Inventory};
use crate::engage::grenade::{nade_handler, GrenadeKind, GrenadeSlot, NadeRequest, NadeStatus};
use crate::engage::weapons::WeaponKind;
use crate::engage::{shoot_at_enemy, FireOutcome};
use crate::entity::{EntityHandle, PlayerClass, Team};
use crate::frame::Frame;
use crate::perception::roster::{living_team_total, team_class_total};
use crate::random::RandomSource;
use crate::threat::assess::assess_threat_level;
use crate::threat::guess::pick_random_enemy_team;
use crate::threat::{enemy_check, EnemyCandidate};
use crate::vector_math::ViewAngles;
use crate::world::{GameRules, ItemSeeker, WorldQuery};

/// Grenade action to actuate this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrenadeAction {
    /// Pull the pin and hold.
    Prime(GrenadeKind),
    /// Release along the command's aim.
    Throw(GrenadeKind),
}

/// Everything the host applies to one bot for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BotCommand {
    /// View angles to set.
    pub aim: ViewAngles,
    /// Weapon to hold.
    pub weapon: Option<WeaponKind>,
    /// Whether the held weapon fires this frame.
    pub fire: bool,
    /// Grenade to prime or throw.
    pub grenade: Option<GrenadeAction>,
    /// Team and class to join; only set on the first tick of a match.
    pub join: Option<(Team, PlayerClass)>,
}

/// What one think decided, for the host and for tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ThinkReport {
    /// Command handed to the host.
    pub command: BotCommand,
    /// State after the tick.
    pub state: BotState,
    /// Enemy engaged this tick.
    pub target: Option<EntityHandle>,
    /// Aggregate threat faced this tick.
    pub threat: u32,
    /// `None` when no shot was attempted.
    pub shot: Option<FireOutcome>,
    /// `None` when the grenade handler was not consulted.
    pub grenade: Option<NadeStatus>,
    /// Whether the item seeker ran this tick.
    pub sought_item: bool,
}

impl ThinkReport {
    fn holding(agent: &BotAgent) -> Self {
        Self {
            command: BotCommand {
                aim: agent.view,
                ..BotCommand::default()
            },
            state: agent.state,
            target: None,
            threat: 0,
            shot: None,
            grenade: None,
            sought_item: false,
        }
    }
}

fn set_state(agent: &mut BotAgent, next: BotState) {
    if agent.state != next {
        debug!("{}: {:?} -> {:?}", agent.name, agent.state, next);
        agent.state = next;
    }
}

/// Reset per-life state after the bot's player (re)spawns.
///
/// Drops the tracked enemy, sound hint and any held grenade, reissues the
/// spawn inventory for the player's class and adopts its current view.
pub fn spawn_init(agent: &mut BotAgent, world: &dyn WorldQuery) {
    agent.disengage();
    agent.sound = None;
    agent.last_fire_time = f32::NEG_INFINITY;
    if let Some(me) = world.player(agent.handle) {
        agent.class = me.class;
        agent.view = me.view;
        agent.me = Some(me);
    }
    agent.inventory = Inventory::for_class(agent.class);
    set_state(agent, BotState::Idle);
}

fn balanced_team(world: &dyn WorldQuery, bot: EntityHandle, team_count: usize) -> Team {
    Team::PLAYABLE
        .into_iter()
        .take(team_count)
        .min_by_key(|&team| living_team_total(world, team, Some(bot)))
        .unwrap_or(Team::Blue)
}

fn scarcest_class(world: &dyn WorldQuery, bot: EntityHandle, team: Team) -> PlayerClass {
    PlayerClass::ALL
        .into_iter()
        .filter(|&class| class != PlayerClass::Civilian)
        .min_by_key(|&class| team_class_total(world, team, class, Some(bot)))
        .unwrap_or(PlayerClass::Soldier)
}

/// One-time match setup: choose team and class.
///
/// A preferred team is kept when it is playable in this match; otherwise
/// the bot joins the team with the fewest living players, ties going to the
/// lowest team. Without a class preference it picks the class least played
/// on that team. Returns the choice for the host to apply.
pub fn start_game(
    agent: &mut BotAgent,
    world: &dyn WorldQuery,
    rules: &dyn GameRules,
    rng: &mut dyn RandomSource,
) -> (Team, PlayerClass) {
    let team_count = rules.team_count().clamp(1, Team::PLAYABLE.len());
    let team = agent
        .preferred_team
        .filter(|t| t.index().is_some_and(|i| i < team_count))
        .unwrap_or_else(|| balanced_team(world, agent.handle, team_count));
    let class = agent
        .preferred_class
        .unwrap_or_else(|| scarcest_class(world, agent.handle, team));

    agent.team = Some(team);
    agent.hunt_team = pick_random_enemy_team(Some(team), team_count, rng);
    agent.class = class;
    agent.inventory = Inventory::for_class(class);
    agent.started = true;
    info!("{} joins {team:?} as {class:?}", agent.name);
    (team, class)
}

fn has_grenades(inventory: &Inventory) -> bool {
    GrenadeSlot::ALL.iter().any(|&slot| inventory.grenades(slot) > 0)
}

fn wants_grenade(
    agent: &BotAgent,
    frame: &Frame<'_>,
    rng: &mut dyn RandomSource,
    target: &EnemyCandidate,
) -> bool {
    let config = &frame.config.grenade;
    if !frame.config.think.grenades_enabled || !has_grenades(&agent.inventory) {
        return false;
    }
    if target.visible() && target.threat < config.threat_threshold {
        return false;
    }
    rng.random_long(1, 100) <= config.chance_percent
}

fn record_grenade(report: &mut ThinkReport, status: NadeStatus) -> bool {
    report.grenade = Some(status);
    match status {
        NadeStatus::Thrown { kind, aim } => {
            report.command.grenade = Some(GrenadeAction::Throw(kind));
            report.command.aim = aim;
            true
        }
        NadeStatus::Primed(kind) => {
            report.command.grenade = Some(GrenadeAction::Prime(kind));
            true
        }
        NadeStatus::Held(_) | NadeStatus::Declined(_) => false,
    }
}

fn engage(
    agent: &mut BotAgent,
    frame: &Frame<'_>,
    rng: &mut dyn RandomSource,
    target: &EnemyCandidate,
    report: &mut ThinkReport,
) {
    set_state(agent, BotState::Engaging);
    report.target = Some(target.handle);

    let acted = if agent.primed.is_some() {
        let request = NadeRequest {
            timed: true,
            hint: None,
        };
        let status = nade_handler(agent, frame, rng, request, target.position);
        record_grenade(report, status)
    } else if wants_grenade(agent, frame, rng, target) {
        let request = NadeRequest {
            timed: !target.visible(),
            hint: None,
        };
        let status = nade_handler(agent, frame, rng, request, target.position);
        record_grenade(report, status)
    } else {
        false
    };

    if !acted {
        let shot = shoot_at_enemy(agent, frame, rng, target);
        report.command.aim = shot.aim;
        report.shot = shot.outcome;
        if let Some(FireOutcome::Fired { weapon, .. }) = shot.outcome {
            report.command.fire = true;
            report.command.weapon = Some(weapon);
        }
    }
}

/// Run one decision tick for `agent`.
///
/// A bot whose player is missing or dead goes to `Spawning` and does
/// nothing else. Otherwise per-life and per-match setup runs when due,
/// enemies are checked, and the bot either engages a target whose threat
/// reaches the configured minimum or hands control to `seeker`. A bot with
/// nothing left to shoot or throw also falls back to seeking.
pub fn think(
    agent: &mut BotAgent,
    frame: &Frame<'_>,
    rng: &mut dyn RandomSource,
    seeker: &mut dyn ItemSeeker,
) -> ThinkReport {
    agent.clear_scratch();
    let Some(me) = frame.world.player(agent.handle).filter(|p| p.alive) else {
        if agent.state != BotState::Spawning {
            agent.disengage();
            set_state(agent, BotState::Spawning);
        }
        agent.me = None;
        return ThinkReport::holding(agent);
    };
    agent.me = Some(me);
    if agent.state == BotState::Spawning {
        spawn_init(agent, frame.world);
    }
    let mut report = ThinkReport::holding(agent);
    if !agent.started {
        report.command.join = Some(start_game(agent, frame.world, frame.rules, rng));
    }

    let target = enemy_check(agent, frame, rng);
    report.threat = assess_threat_level(agent);
    match target.filter(|t| t.threat >= frame.config.threat.min_engage_threat) {
        Some(enemy) => engage(agent, frame, rng, &enemy, &mut report),
        None => {
            if let Some(primed) = agent.primed {
                let request = NadeRequest {
                    timed: primed.timed,
                    hint: None,
                };
                let status = nade_handler(agent, frame, rng, request, primed.target);
                record_grenade(&mut report, status);
            }
            set_state(agent, BotState::Seeking);
        }
    }

    let exhausted = !agent.inventory.any_fireable() && !has_grenades(&agent.inventory);
    if exhausted && agent.state == BotState::Engaging && agent.primed.is_none() {
        debug!("{} is out of ammunition and grenades", agent.name);
        set_state(agent, BotState::Seeking);
    }
    if agent.state == BotState::Seeking {
        seeker.find_item(agent);
        report.sought_item = true;
    }
    report.state = agent.state;
    trace!(
        "{} tick: {:?}, threat {}, target {:?}",
        agent.name,
        report.state,
        report.threat,
        report.target
    );
    report
}
