//! Enemy discovery and target selection.
//!
//! [`enemy_check`] rebuilds the agent's candidate list every tick from what
//! it can see, what it has heard and what it remembers, scores each entry
//! and arbitrates between them.

pub mod assess;
pub mod guess;
pub mod multigun;

use glam::Vec3;
use log::{debug, trace};

use crate::agent::{BotAgent, EnemyMemory, Sighting};
use crate::entity::{EntityHandle, PlayerSnapshot};
use crate::frame::Frame;
use crate::perception::sound::expire_sound;
use crate::perception::{in_field_of_view, visible_point_of};
use crate::random::RandomSource;

use self::assess::{threat_score, ThreatInputs};
use self::guess::guess_player_position;
use self::multigun::select_target;

/// How the bot knows about a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Awareness {
    /// In the view cone with a clear line to the body or head.
    Visible,
    /// Source of the bot's current sound hint.
    Heard,
    /// Hidden, but seen within the memory window.
    Remembered,
}

/// One enemy considered this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyCandidate {
    /// Enemy player.
    pub handle: EntityHandle,
    /// How the bot knows about it.
    pub awareness: Awareness,
    /// Actual position when visible, otherwise an estimate.
    pub position: Vec3,
    /// Observed velocity; zero unless visible.
    pub velocity: Vec3,
    /// Squared distance from the bot's eye to `position`.
    pub distance_sq: f32,
    /// Score from [`assess::threat_score`].
    pub threat: u32,
    /// Whether it holds an objective.
    pub carrier: bool,
}

impl EnemyCandidate {
    /// Whether the candidate is in sight.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.awareness == Awareness::Visible
    }
}

fn forget_stale_enemy(agent: &mut BotAgent, frame: &Frame<'_>) {
    let Some(memory) = agent.enemy else {
        return;
    };
    let alive = frame
        .world
        .player(memory.handle)
        .is_some_and(|p| p.alive);
    let expired = frame.now - memory.last_seen.time > frame.config.threat.enemy_memory_seconds;
    if !alive || expired {
        debug!(
            "{} forgets enemy {} ({})",
            agent.name,
            memory.handle,
            if alive { "lost track" } else { "gone" }
        );
        agent.enemy = None;
    }
}

/// How `agent` knows about `enemy`, and where it is believed to be.
fn locate(
    agent: &BotAgent,
    frame: &Frame<'_>,
    rng: &mut dyn RandomSource,
    eye: Vec3,
    handle: EntityHandle,
    enemy: &PlayerSnapshot,
) -> Option<(Awareness, Vec3, Vec3)> {
    let in_view =
        in_field_of_view(agent.view, eye, enemy.origin, &frame.config.perception).contains();
    if in_view && visible_point_of(frame.world, agent.handle, eye, handle).is_some() {
        return Some((Awareness::Visible, enemy.origin, enemy.velocity));
    }
    let threat = &frame.config.threat;
    if let Some(hint) = agent.sound.filter(|hint| hint.source == handle) {
        let heard = Sighting {
            position: hint.position,
            velocity: Vec3::ZERO,
            time: hint.time,
        };
        if let Some(guess) = guess_player_position(Some(&heard), frame.now, threat, rng) {
            return Some((Awareness::Heard, guess, Vec3::ZERO));
        }
    }
    let memory = agent.enemy.filter(|m| m.handle == handle)?;
    guess_player_position(Some(&memory.last_seen), frame.now, threat, rng)
        .map(|guess| (Awareness::Remembered, guess, Vec3::ZERO))
}

/// Find the enemy `agent` should deal with this tick.
///
/// Living players on hostile playable teams are considered when visible,
/// when they are the source of the agent's current sound hint, or when they
/// are the remembered enemy still inside the memory window. Each is scored
/// and the pick is made by [`select_target`]. The candidate list is left in
/// the agent's scratch for [`assess::assess_threat_level`].
///
/// A visible pick refreshes the agent's enemy memory. With no candidates the
/// memory is cleared. Stale handles never fault; they are skipped.
pub fn enemy_check(
    agent: &mut BotAgent,
    frame: &Frame<'_>,
    rng: &mut dyn RandomSource,
) -> Option<EnemyCandidate> {
    agent.scratch.candidates.clear();
    let me = agent.me.clone()?;
    let eye = me.eye_position();

    forget_stale_enemy(agent, frame);
    expire_sound(agent, frame.world, &frame.config.perception, frame.now);

    let mut candidates = Vec::new();
    for handle in frame.world.players() {
        if handle == agent.handle {
            continue;
        }
        let Some(enemy) = frame.world.player(handle) else {
            continue;
        };
        if !enemy.alive || !enemy.team.is_playable() || frame.rules.allied(me.team, enemy.team) {
            continue;
        }

        let Some((awareness, position, velocity)) = locate(agent, frame, rng, eye, handle, &enemy)
        else {
            continue;
        };
        let sighted = awareness == Awareness::Visible;

        let carrier = frame.registry.has_flag(handle);
        let threat = threat_score(
            &ThreatInputs {
                observer_eye: eye,
                enemy: &enemy,
                position,
                visible: sighted,
                carrier,
            },
            &frame.config.threat,
        );
        trace!("{} considers {handle}: {awareness:?}, threat {threat}", agent.name);
        candidates.push(EnemyCandidate {
            handle,
            awareness,
            position,
            velocity,
            distance_sq: eye.distance_squared(position),
            threat,
            carrier,
        });
    }

    let chosen = select_target(&candidates, frame.config.threat.multigun_margin).cloned();
    match &chosen {
        Some(pick) if pick.visible() => {
            if agent.enemy.map(|m| m.handle) != Some(pick.handle) {
                debug!("{} targets {} (threat {})", agent.name, pick.handle, pick.threat);
            }
            agent.enemy = Some(EnemyMemory {
                handle: pick.handle,
                last_seen: Sighting {
                    position: pick.position,
                    velocity: pick.velocity,
                    time: frame.now,
                },
            });
        }
        Some(_) => {}
        None => agent.enemy = None,
    }
    agent.scratch.candidates = candidates;
    chosen
}
