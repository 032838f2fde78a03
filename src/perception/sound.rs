//! Hearing: turning game sounds into suspected enemy positions.

use log::trace;

use crate::agent::{BotAgent, SoundHint};
use crate::config::PerceptionConfig;
use crate::entity::EntityHandle;
use crate::world::{GameRules, WorldQuery};

/// A sound emitted by an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEvent {
    /// Entity that made the sound.
    pub source: EntityHandle,
    /// Sample path such as `weapons/sgun1.wav`.
    pub sample: String,
    /// Emitted volume in `[0, 1]`.
    pub volume: f32,
}

impl SoundEvent {
    /// Sound of `sample` played by `source` at `volume`.
    #[must_use]
    pub fn new(source: EntityHandle, sample: impl Into<String>, volume: f32) -> Self {
        Self {
            source,
            sample: sample.into(),
            volume,
        }
    }
}

/// Broad category of a sample, by path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    /// Gunfire and explosions.
    Weapon,
    /// Player movement.
    Footstep,
    /// Anything else.
    Other,
}

impl SoundKind {
    /// Classify a sample path.
    #[must_use]
    pub fn of_sample(sample: &str) -> Self {
        if sample.starts_with("weapons/") {
            Self::Weapon
        } else if sample.starts_with("player/pl_") {
            Self::Footstep
        } else {
            Self::Other
        }
    }

    /// How much of the emitted volume registers with a listener.
    #[must_use]
    pub const fn salience(self) -> f32 {
        match self {
            Self::Weapon => 1.0,
            Self::Footstep => 0.6,
            Self::Other => 0.8,
        }
    }
}

/// Let `agent` hear `event`; returns whether a position hint was recorded.
///
/// Only sounds from living players on hostile teams count. Loudness falls off
/// linearly to zero at the hearing range and must reach the attention
/// threshold. A fresh hint is only replaced by a louder one or by any hint
/// once it has expired.
pub fn sound_sense(
    agent: &mut BotAgent,
    event: &SoundEvent,
    world: &dyn WorldQuery,
    rules: &dyn GameRules,
    config: &PerceptionConfig,
    now: f32,
) -> bool {
    if event.source == agent.handle {
        return false;
    }
    let (Some(me), Some(source)) = (agent.me.as_ref(), world.player(event.source)) else {
        return false;
    };
    if !source.alive || !source.team.is_playable() || rules.allied(me.team, source.team) {
        return false;
    }

    let distance = me.origin.distance(source.origin);
    let falloff = (1.0 - distance / config.hearing_range).clamp(0.0, 1.0);
    let kind = SoundKind::of_sample(&event.sample);
    let heard = event.volume.clamp(0.0, 1.0) * kind.salience() * falloff;
    if heard < config.sound_attention_volume {
        return false;
    }

    if let Some(current) = agent.sound {
        let fresh = now - current.time <= config.sound_memory_seconds;
        if fresh && current.volume > heard {
            return false;
        }
    }
    trace!(
        "{} heard {:?} from {} at volume {heard:.2}",
        agent.name,
        kind,
        event.source
    );
    agent.sound = Some(SoundHint {
        source: event.source,
        position: source.origin,
        volume: heard,
        time: now,
    });
    true
}

/// Drop a hint that has outlived the sound memory or whose source is gone.
pub fn expire_sound(
    agent: &mut BotAgent,
    world: &dyn WorldQuery,
    config: &PerceptionConfig,
    now: f32,
) {
    if let Some(hint) = agent.sound {
        if now - hint.time > config.sound_memory_seconds || !world.entity_is_valid(hint.source) {
            agent.sound = None;
        }
    }
}
