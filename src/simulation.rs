//! The bot roster and the process-wide state every think reads.
//!
//! A host drives the engine once per frame:
//!
//! 1. [`Simulation::begin_frame`] refreshes the carrier registry;
//! 2. [`Simulation::update_skill_inaccuracy`] redraws the shared skill
//!    parameter when its cadence is due;
//! 3. [`Simulation::think_all`] runs every bot in roster order and hands
//!    each command to the [`ActuationSink`].
//!
//! [`Simulation::run_frame`] performs all three. Sounds may be fed in with
//! [`Simulation::sound_sense`] at any point between frames.

use std::panic::{self, AssertUnwindSafe};

use log::{error, info};
use thiserror::Error;

use crate::agent::{BotAgent, BotProfile};
use crate::config::BotConfig;
use crate::entity::EntityHandle;
use crate::frame::Frame;
use crate::perception::roster::CarrierRegistry;
use crate::perception::sound::{sound_sense, SoundEvent};
use crate::random::RandomSource;
use crate::skill::SkillInaccuracy;
use crate::think::{think, ThinkReport};
use crate::world::{ActuationSink, GameRules, ItemSeeker, WorldQuery};

/// Failure of one bot's think; the rest of the frame is unaffected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThinkError {
    /// The think faulted and the bot was reset.
    #[error("think for bot {bot} faulted: {detail}")]
    Fault {
        /// Bot whose think faulted.
        bot: EntityHandle,
        /// Panic message, when one was given.
        detail: String,
    },
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown fault".to_owned())
}

/// Roster plus shared state for one match.
pub struct Simulation {
    config: BotConfig,
    bots: Vec<BotAgent>,
    registry: CarrierRegistry,
    skill: SkillInaccuracy,
    rng: Box<dyn RandomSource>,
    now: f32,
}

impl Simulation {
    /// Empty roster using `config` and drawing from `rng`.
    #[must_use]
    pub fn new(config: BotConfig, rng: Box<dyn RandomSource>) -> Self {
        let skill = SkillInaccuracy::new(&config.skill);
        Self {
            config,
            bots: Vec::new(),
            registry: CarrierRegistry::new(),
            skill,
            rng,
            now: 0.0,
        }
    }

    /// Tuning shared by every bot.
    #[must_use]
    pub const fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Carrier registry as of the last frame.
    #[must_use]
    pub const fn registry(&self) -> &CarrierRegistry {
        &self.registry
    }

    /// Shared aim inaccuracy.
    #[must_use]
    pub const fn skill(&self) -> &SkillInaccuracy {
        &self.skill
    }

    /// Time of the current frame.
    #[must_use]
    pub const fn now(&self) -> f32 {
        self.now
    }

    /// Register a bot controlling `handle`.
    ///
    /// Returns `false`, leaving the roster unchanged, when `handle` already
    /// has a bot.
    pub fn add_bot(&mut self, handle: EntityHandle, profile: BotProfile) -> bool {
        if self.bot(handle).is_some() {
            return false;
        }
        let agent = BotAgent::new(handle, profile, self.config.skill.default_skill);
        info!("bot {} created for {handle} at skill {:.2}", agent.name, agent.skill);
        self.bots.push(agent);
        true
    }

    /// Remove and return the bot controlling `handle`.
    pub fn remove_bot(&mut self, handle: EntityHandle) -> Option<BotAgent> {
        let index = self.bots.iter().position(|b| b.handle == handle)?;
        Some(self.bots.remove(index))
    }

    /// Bot controlling `handle`.
    #[must_use]
    pub fn bot(&self, handle: EntityHandle) -> Option<&BotAgent> {
        self.bots.iter().find(|b| b.handle == handle)
    }

    /// Mutable bot controlling `handle`.
    pub fn bot_mut(&mut self, handle: EntityHandle) -> Option<&mut BotAgent> {
        self.bots.iter_mut().find(|b| b.handle == handle)
    }

    /// Bots in roster order.
    #[must_use]
    pub fn bots(&self) -> &[BotAgent] {
        &self.bots
    }

    /// Forget every bot's match setup so the next think chooses again.
    pub fn new_match(&mut self) {
        for bot in &mut self.bots {
            bot.started = false;
        }
    }

    /// Advance the clock to `now` and rebuild the carrier registry.
    pub fn begin_frame(&mut self, now: f32, world: &dyn WorldQuery, rules: &dyn GameRules) {
        self.now = now;
        self.registry.update(world, rules);
    }

    /// Redraw the shared skill parameter if its cadence is due.
    ///
    /// Returns whether it was redrawn.
    pub fn update_skill_inaccuracy(&mut self) -> bool {
        self.skill.update(self.now, self.rng.as_mut(), &self.config.skill)
    }

    /// Let every bot except the source hear `event`.
    ///
    /// Returns how many bots recorded a hint.
    pub fn sound_sense(
        &mut self,
        world: &dyn WorldQuery,
        rules: &dyn GameRules,
        event: &SoundEvent,
    ) -> usize {
        let mut heard = 0;
        for bot in &mut self.bots {
            if sound_sense(bot, event, world, rules, &self.config.perception, self.now) {
                heard += 1;
            }
        }
        heard
    }

    /// Think every bot once and apply the resulting commands.
    ///
    /// A bot whose think faults is reset, gets no command this frame and is
    /// reported as an error; the remaining bots still think.
    pub fn think_all(
        &mut self,
        delta: f32,
        world: &dyn WorldQuery,
        rules: &dyn GameRules,
        seeker: &mut dyn ItemSeeker,
        sink: &mut dyn ActuationSink,
    ) -> Vec<Result<ThinkReport, ThinkError>> {
        let frame = Frame {
            world,
            rules,
            registry: &self.registry,
            skill: &self.skill,
            config: &self.config,
            now: self.now,
            delta,
        };
        let rng = self.rng.as_mut();
        let mut results = Vec::with_capacity(self.bots.len());
        for agent in &mut self.bots {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                think(agent, &frame, &mut *rng, &mut *seeker)
            }));
            match outcome {
                Ok(report) => {
                    sink.apply(agent.handle, &report.command);
                    results.push(Ok(report));
                }
                Err(payload) => {
                    let detail = panic_detail(payload.as_ref());
                    error!("think for {} faulted: {detail}", agent.name);
                    agent.disengage();
                    results.push(Err(ThinkError::Fault {
                        bot: agent.handle,
                        detail,
                    }));
                }
            }
        }
        results
    }

    /// Run a whole frame at time `now`.
    pub fn run_frame(
        &mut self,
        now: f32,
        delta: f32,
        world: &dyn WorldQuery,
        rules: &dyn GameRules,
        seeker: &mut dyn ItemSeeker,
        sink: &mut dyn ActuationSink,
    ) -> Vec<Result<ThinkReport, ThinkError>> {
        self.begin_frame(now, world, rules);
        self.update_skill_inaccuracy();
        self.think_all(delta, world, rules, seeker, sink)
    }
}
