//! Utility helpers for tests.
//!
//! [`Duel`] sets up one bot facing a passive enemy in an [`Arena`] and steps
//! whole frames; the seekers record or sabotage item seeking.

use fortbot::agent::BotAgent;
use fortbot::{
    Arena, BotConfig, BotProfile, CommandBuffer, EntityHandle, ItemSeeker, PlayerClass,
    PlayerSnapshot, ScriptedRandom, Simulation, StdRandom, Team, ThinkError, ThinkReport,
};
use glam::Vec3;

/// Configuration with grenades switched off.
pub fn no_grenades() -> BotConfig {
    let mut config = BotConfig::default();
    config.think.grenades_enabled = false;
    config
}

/// Random source replaying `draws` as unit fractions of each requested range.
pub fn scripted(draws: &[f32]) -> ScriptedRandom {
    ScriptedRandom::new(draws.iter().copied())
}

/// Blue soldier bot at the origin facing `+x`, red soldier target down range.
pub struct Duel {
    pub sim: Simulation,
    pub arena: Arena,
    pub bot: EntityHandle,
    pub enemy: EntityHandle,
    pub buffer: CommandBuffer,
    pub now: f32,
}

impl Duel {
    /// Duel with the enemy `distance` units along `+x`.
    pub fn new(config: BotConfig, skill: f32, distance: f32, seed: u64) -> Self {
        let mut arena = Arena::new(2);
        let bot = arena.spawn(PlayerSnapshot::new(
            Team::Blue,
            PlayerClass::Soldier,
            Vec3::ZERO,
        ));
        let enemy = arena.spawn(PlayerSnapshot::new(
            Team::Red,
            PlayerClass::Soldier,
            Vec3::X * distance,
        ));
        let mut sim = Simulation::new(config, Box::new(StdRandom::seeded(seed)));
        sim.add_bot(
            bot,
            BotProfile {
                name: "duelist".to_owned(),
                skill: Some(skill),
                team: Some(Team::Blue),
                class: Some(PlayerClass::Soldier),
            },
        );
        Self {
            sim,
            arena,
            bot,
            enemy,
            buffer: CommandBuffer::default(),
            now: 0.0,
        }
    }

    /// Run one frame, apply its commands to the arena and advance the clock.
    pub fn step(
        &mut self,
        delta: f32,
        seeker: &mut dyn ItemSeeker,
    ) -> Vec<Result<ThinkReport, ThinkError>> {
        let results = self.sim.run_frame(
            self.now,
            delta,
            &self.arena,
            &self.arena,
            seeker,
            &mut self.buffer,
        );
        self.buffer.flush_into(&mut self.arena);
        self.now += delta;
        results
    }

    /// Report for the duelling bot from one frame's results.
    ///
    /// # Panics
    /// Panics when the bot's think faulted or no report was produced.
    pub fn report(results: &[Result<ThinkReport, ThinkError>]) -> ThinkReport {
        match results.first() {
            Some(Ok(report)) => report.clone(),
            other => panic!("expected a think report, got {other:?}"),
        }
    }

    /// The duelling bot's agent.
    ///
    /// # Panics
    /// Panics if the bot was removed from the roster.
    pub fn agent(&self) -> &BotAgent {
        self.sim.bot(self.bot).expect("duelling bot is registered")
    }
}

/// Seeker counting its calls and the bots it served.
#[derive(Debug, Default)]
pub struct RecordingSeeker {
    pub served: Vec<EntityHandle>,
}

impl RecordingSeeker {
    pub fn calls(&self) -> usize {
        self.served.len()
    }
}

impl ItemSeeker for RecordingSeeker {
    fn find_item(&mut self, agent: &BotAgent) {
        self.served.push(agent.handle);
    }
}

/// Seeker that panics when asked to serve one particular bot.
#[derive(Debug)]
pub struct FaultySeeker {
    pub victim: EntityHandle,
    pub served: Vec<EntityHandle>,
}

impl FaultySeeker {
    pub fn new(victim: EntityHandle) -> Self {
        Self {
            victim,
            served: Vec::new(),
        }
    }
}

impl ItemSeeker for FaultySeeker {
    fn find_item(&mut self, agent: &BotAgent) {
        assert!(agent.handle != self.victim, "item search failed for {}", agent.name);
        self.served.push(agent.handle);
    }
}
