//! Demo driver: two teams of bots fight in the reference arena.
//!
//! Prints a shot tally when the run ends. `RUST_LOG` controls the detail.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use fortbot::perception::sound::SoundEvent;
use fortbot::prelude::*;
use fortbot::{init_logging, CommandBuffer};
use log::{info, warn};

/// Runs bots against each other in an in-memory arena
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,
    /// Seconds per frame
    #[arg(long, default_value_t = 0.05)]
    delta: f32,
    /// Bots on each side
    #[arg(short, long, default_value_t = 3)]
    bots: u32,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Aim skill in [0, 1] for every bot
    #[arg(long)]
    skill: Option<f32>,
    /// TOML file overriding the default tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Half the arena's width along the strafe axis.
const STRAFE_LIMIT: f32 = 400.0;
const SPAWN_DISTANCE: f32 = 600.0;
const RESPAWN_SECONDS: f32 = 3.0;

fn spawn_point(team: Team, slot: u32) -> Vec3 {
    let x = if team == Team::Blue {
        -SPAWN_DISTANCE
    } else {
        SPAWN_DISTANCE
    };
    #[expect(clippy::cast_precision_loss, reason = "Bot counts are small.")]
    let y = slot as f32 * 96.0 - STRAFE_LIMIT * 0.5;
    Vec3::new(x, y, 0.0)
}

fn build_arena(sim: &mut Simulation, bots: u32, skill: Option<f32>) -> Arena {
    let mut arena = Arena::new(2);
    arena.add_wall(Vec3::new(-40.0, -60.0, -10.0), Vec3::new(40.0, 60.0, 120.0));
    for team in [Team::Blue, Team::Red] {
        for slot in 0..bots {
            let mut player = PlayerSnapshot::new(team, PlayerClass::Soldier, spawn_point(team, slot));
            player.velocity = Vec3::Y * if slot % 2 == 0 { 80.0 } else { -80.0 };
            let handle = arena.spawn(player);
            let profile = BotProfile {
                name: format!("{team:?}-{slot}").to_lowercase(),
                skill,
                team: Some(team),
                class: None,
            };
            sim.add_bot(handle, profile);
        }
    }
    arena
}

fn strafe(arena: &mut Arena, bots: &[EntityHandle]) {
    for &handle in bots {
        if let Some(player) = arena.get_mut(handle) {
            if player.origin.y.abs() > STRAFE_LIMIT {
                player.velocity.y = -player.origin.y.signum() * player.velocity.y.abs();
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(args.delta > 0.0, "--delta must be positive, got {}", args.delta);

    let config = match &args.config {
        Some(path) => BotConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => BotConfig::default(),
    };
    let rng = args.seed.map_or_else(StdRandom::from_entropy, StdRandom::seeded);
    let mut sim = Simulation::new(config, Box::new(rng));
    let mut arena = build_arena(&mut sim, args.bots, args.skill);
    let handles: Vec<EntityHandle> = sim.bots().iter().map(|b| b.handle).collect();
    let mut deaths: Vec<(EntityHandle, f32)> = Vec::new();
    let mut buffer = CommandBuffer::default();
    let mut seeker = IdleSeeker;
    let mut faults = 0_usize;

    for tick in 0..args.ticks {
        #[expect(clippy::cast_precision_loss, reason = "Tick counts stay far below 2^24.")]
        let now = tick as f32 * args.delta;
        arena.advance(args.delta);
        strafe(&mut arena, &handles);

        for &handle in &handles {
            let moving = arena.get(handle).is_some_and(|p| p.alive);
            if moving && tick % 20 == 0 {
                let step = SoundEvent::new(handle, "player/pl_step1.wav", 0.8);
                sim.sound_sense(&arena, &arena, &step);
            }
        }

        let results = sim.run_frame(now, args.delta, &arena, &arena, &mut seeker, &mut buffer);
        for error in results.iter().filter_map(|r| r.as_ref().err()) {
            warn!("{error}");
            faults += 1;
        }
        buffer.flush_into(&mut arena);

        for &handle in &handles {
            let dead = arena.get(handle).is_some_and(|p| !p.alive);
            if dead && !deaths.iter().any(|&(h, _)| h == handle) {
                deaths.push((handle, now));
            }
        }
        deaths.retain(|&(handle, died)| {
            if now - died < RESPAWN_SECONDS {
                return true;
            }
            let team = arena.get(handle).map_or(Team::Blue, |p| p.team);
            let slot = handle.index() % args.bots.max(1);
            !arena.respawn(handle, spawn_point(team, slot))
        });
    }

    let tally = arena.tally();
    info!(
        "{} ticks: {} shots, {} hits, {} frags, {} faults",
        args.ticks, tally.shots, tally.hits, tally.frags, faults
    );
    Ok(())
}
