//! Read-only context shared by every sub-step of one bot's think.

use crate::config::BotConfig;
use crate::perception::roster::CarrierRegistry;
use crate::skill::SkillInaccuracy;
use crate::world::{GameRules, WorldQuery};

/// Everything a think reads besides the agent itself and the random source.
///
/// The registry and skill parameter are refreshed before any agent thinks in
/// a frame and stay fixed until the frame ends.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    /// Entity state, traces and view checks.
    pub world: &'a dyn WorldQuery,
    /// Objective, infection and team-relation rules.
    pub rules: &'a dyn GameRules,
    /// Carriers and infected entities for this frame.
    pub registry: &'a CarrierRegistry,
    /// Process-wide aim degradation for this frame.
    pub skill: &'a SkillInaccuracy,
    /// Tuning shared by every bot.
    pub config: &'a BotConfig,
    /// Simulation time in seconds.
    pub now: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}
