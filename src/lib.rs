//! Perception and combat decision engine for team shooter bots.
//!
//! Each frame the host refreshes the shared state and asks every bot to
//! think; a think perceives enemies, scores and selects a target, aims and
//! fires or throws a grenade, and emits one [`think::BotCommand`]. The host
//! world is reached only through the traits in [`world`].
pub mod agent;
pub mod arena;
pub mod config;
pub mod constants;
pub mod engage;
pub mod entity;
pub mod frame;
pub mod logging;
pub mod numeric;
pub mod perception;
pub mod random;
pub mod simulation;
pub mod skill;
pub mod think;
pub mod threat;
pub mod vector_math;
pub mod world;
pub use constants::*;

// Re-export commonly used items
pub use agent::{BotAgent, BotProfile, BotState};
pub use arena::Arena;
pub use config::{BotConfig, ConfigError};
pub use entity::{EntityHandle, PlayerClass, PlayerSnapshot, Team};
pub use logging::init as init_logging;
pub use random::{RandomSource, ScriptedRandom, StdRandom};
pub use simulation::{Simulation, ThinkError};
pub use think::{BotCommand, ThinkReport};
pub use vector_math::{vec_to_angles, ViewAngles};
pub use world::{
    ActuationSink, CommandBuffer, GameRules, IdleSeeker, ItemSeeker, TraceResult, WorldQuery,
};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use fortbot::prelude::*;
    //! ```

    pub use crate::engage::grenade::{GrenadeKind, NadeStatus};
    pub use crate::engage::weapons::WeaponKind;
    pub use crate::engage::FireOutcome;
    pub use crate::perception::sound::SoundEvent;
    pub use crate::threat::EnemyCandidate;
    pub use crate::{
        Arena, BotConfig, BotProfile, BotState, EntityHandle, IdleSeeker, PlayerClass,
        PlayerSnapshot, Simulation, StdRandom, Team, ViewAngles,
    };
    pub use glam::Vec3;
}
