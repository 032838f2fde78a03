//! Services the host simulation provides to the decision engine.
//!
//! Every query here must tolerate stale handles: a handle whose entity has
//! been removed resolves to `false`, `None` or an unobstructed trace rather
//! than faulting.

use glam::Vec3;

use crate::agent::BotAgent;
use crate::entity::{EntityHandle, PlayerSnapshot, Team};
use crate::think::BotCommand;

/// Outcome of a line trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceResult {
    /// Fraction of the segment travelled before the first hit; `1.0` when clear.
    pub fraction: f32,
    /// Entity struck first, if the blocker was an entity.
    pub hit: Option<EntityHandle>,
}

impl TraceResult {
    /// Unobstructed trace.
    pub const CLEAR: Self = Self {
        fraction: 1.0,
        hit: None,
    };

    /// Whether anything stopped the trace short of its end.
    #[must_use]
    pub const fn blocked(&self) -> bool {
        self.fraction < 1.0
    }
}

/// Read-only view of world geometry and entities.
#[cfg_attr(test, mockall::automock)]
pub trait WorldQuery {
    /// Trace a line from `start` to `end`, passing through `ignore`.
    fn trace_line(&self, start: Vec3, end: Vec3, ignore: Option<EntityHandle>) -> TraceResult;

    /// Whether `entity` still resolves to a live slot.
    fn entity_is_valid(&self, entity: EntityHandle) -> bool;

    /// Origin of `entity`, or `None` when the handle is stale.
    fn entity_origin(&self, entity: EntityHandle) -> Option<Vec3>;

    /// Current facts about a player, or `None` when the handle is stale or not a player.
    fn player(&self, entity: EntityHandle) -> Option<PlayerSnapshot>;

    /// Handles of every connected player in stable order.
    fn players(&self) -> Vec<EntityHandle>;
}

/// Rules-engine facts about teams and objectives.
#[cfg_attr(test, mockall::automock)]
pub trait GameRules {
    /// Number of playable teams in the current match, from blue upwards.
    fn team_count(&self) -> usize;

    /// Maximum number of simultaneous objective carriers.
    fn objective_slots(&self) -> usize;

    /// Entities currently holding an objective item.
    fn objective_carriers(&self) -> Vec<EntityHandle>;

    /// Entities currently infected.
    fn infected(&self) -> Vec<EntityHandle>;

    /// Whether players of `a` and `b` fight on the same side.
    fn allied(&self, a: Team, b: Team) -> bool {
        a == b
    }
}

/// Item-seeking collaborator invoked when a bot has nothing to fight.
#[cfg_attr(test, mockall::automock)]
pub trait ItemSeeker {
    /// Choose and pursue an item for `agent`.
    fn find_item(&mut self, agent: &BotAgent);
}

/// Receives the per-frame command for each bot.
pub trait ActuationSink {
    /// Apply `command` to `bot`; a later write in the same frame replaces it.
    fn apply(&mut self, bot: EntityHandle, command: &BotCommand);
}

/// Item seeker that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleSeeker;

impl ItemSeeker for IdleSeeker {
    fn find_item(&mut self, _agent: &BotAgent) {}
}

/// Sink that holds one command per bot until the host applies them.
///
/// Lets a host that answers the world queries itself collect a frame's
/// commands first and apply them once the frame's borrows end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandBuffer {
    commands: Vec<(EntityHandle, BotCommand)>,
}

impl CommandBuffer {
    /// Commands collected so far, in first-write order.
    #[must_use]
    pub fn commands(&self) -> &[(EntityHandle, BotCommand)] {
        &self.commands
    }

    /// Replay every held command into `sink`, leaving the buffer empty.
    pub fn flush_into(&mut self, sink: &mut dyn ActuationSink) {
        for (bot, command) in self.commands.drain(..) {
            sink.apply(bot, &command);
        }
    }
}

impl ActuationSink for CommandBuffer {
    fn apply(&mut self, bot: EntityHandle, command: &BotCommand) {
        if let Some((_, held)) = self.commands.iter_mut().find(|(held, _)| *held == bot) {
            *held = *command;
            return;
        }
        self.commands.push((bot, *command));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_math::ViewAngles;

    #[test]
    fn later_command_replaces_earlier_one() {
        let bot = EntityHandle::new(3, 0);
        let mut buffer = CommandBuffer::default();
        buffer.apply(bot, &BotCommand::default());
        let second = BotCommand {
            aim: ViewAngles::new(0.0, 90.0),
            fire: true,
            ..BotCommand::default()
        };
        buffer.apply(bot, &second);
        assert_eq!(buffer.commands(), &[(bot, second)]);
    }
}
