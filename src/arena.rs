//! In-memory reference world.
//!
//! The arena keeps players in a generation-checked slot table, blocks sight
//! with axis-aligned walls and gives every player a spherical hull. It
//! answers [`WorldQuery`] and [`GameRules`] and, as an [`ActuationSink`],
//! applies bot commands: view, team and class changes, and hit resolution
//! for shots. It backs the demo binary and the integration tests.

use glam::Vec3;
use hashbrown::HashMap;
use log::{debug, info};
use ordered_float::OrderedFloat;

use crate::engage::weapons::{DangerTier, WeaponKind};
use crate::entity::{EntityHandle, PlayerSnapshot, Team};
use crate::think::BotCommand;
use crate::world::{ActuationSink, GameRules, TraceResult, WorldQuery};
use crate::{EYE_HEIGHT, PLAYER_HULL_RADIUS};

/// Extra radius within which explosives still hurt.
const SPLASH_RADIUS: f32 = 64.0;

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    player: Option<PlayerSnapshot>,
}

/// Axis-aligned box that blocks traces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    /// Lowest corner.
    pub min: Vec3,
    /// Highest corner.
    pub max: Vec3,
}

/// Running totals of resolved shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShotTally {
    /// Shots fired.
    pub shots: usize,
    /// Shots that struck an enemy.
    pub hits: usize,
    /// Hits that killed.
    pub frags: usize,
}

/// Reference world for bots to think in.
#[derive(Debug, Clone)]
pub struct Arena {
    slots: Vec<Slot>,
    walls: Vec<Wall>,
    team_count: usize,
    objective_slots: usize,
    carriers: Vec<EntityHandle>,
    infected: Vec<EntityHandle>,
    commands: HashMap<EntityHandle, BotCommand>,
    tally: ShotTally,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Parametric `t` in `[0, 1]` at which the segment first enters the box.
fn segment_enters_box(p0: Vec3, p1: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let d = p1 - p0;
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;
    let slabs = min.to_array().into_iter().zip(max.to_array());
    for ((start, dir), (low, high)) in p0.to_array().into_iter().zip(d.to_array()).zip(slabs) {
        if dir.abs() < 1e-6 {
            if start < low || start > high {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let (mut t0, mut t1) = ((low - start) * inv, (high - start) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }
    Some(t_enter)
}

/// Parametric `t` in `[0, 1]` at which the segment first touches the sphere.
fn segment_enters_sphere(p0: Vec3, p1: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let d = p1 - p0;
    let m = p0 - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let a = d.length_squared();
    if a <= f32::EPSILON {
        return None;
    }
    let b = m.dot(d);
    let discriminant = b * b - a * c;
    if b > 0.0 || discriminant < 0.0 {
        return None;
    }
    let t = (-b - discriminant.sqrt()) / a;
    (t <= 1.0).then_some(t.max(0.0))
}

fn hull_center(origin: Vec3) -> Vec3 {
    origin + Vec3::Z * (EYE_HEIGHT * 0.5)
}

const fn shot_damage(weapon: WeaponKind) -> i32 {
    match weapon.spec().danger {
        DangerTier::Melee => 25,
        DangerTier::Light => 10,
        DangerTier::Precision => 50,
        DangerTier::Heavy => 15,
        DangerTier::Explosive => 40,
    }
}

impl Arena {
    /// Empty arena with `team_count` playable teams and one objective slot.
    #[must_use]
    pub fn new(team_count: usize) -> Self {
        Self {
            slots: Vec::new(),
            walls: Vec::new(),
            team_count,
            objective_slots: 1,
            carriers: Vec::new(),
            infected: Vec::new(),
            commands: HashMap::new(),
            tally: ShotTally::default(),
        }
    }

    /// Insert `player`, reusing the lowest free slot.
    pub fn spawn(&mut self, player: PlayerSnapshot) -> EntityHandle {
        let free = self.slots.iter().position(|s| s.player.is_none());
        let index = free.unwrap_or_else(|| {
            self.slots.push(Slot::default());
            self.slots.len() - 1
        });
        let generation = self.slots.get_mut(index).map_or(0, |slot| {
            slot.player = Some(player);
            slot.generation
        });
        let handle = EntityHandle::new(u32::try_from(index).unwrap_or(u32::MAX), generation);
        debug!("arena spawned {handle}");
        handle
    }

    fn slot(&self, handle: EntityHandle) -> Option<&Slot> {
        let slot = self.slots.get(usize::try_from(handle.index()).ok()?)?;
        (slot.generation == handle.generation()).then_some(slot)
    }

    fn slot_mut(&mut self, handle: EntityHandle) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(usize::try_from(handle.index()).ok()?)?;
        (slot.generation == handle.generation()).then_some(slot)
    }

    /// Remove a player; its handle goes stale.
    pub fn remove(&mut self, handle: EntityHandle) -> Option<PlayerSnapshot> {
        let slot = self.slot_mut(handle)?;
        let player = slot.player.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.carriers.retain(|&h| h != handle);
        self.infected.retain(|&h| h != handle);
        self.commands.remove(&handle);
        Some(player)
    }

    /// Player behind a live `handle`.
    #[must_use]
    pub fn get(&self, handle: EntityHandle) -> Option<&PlayerSnapshot> {
        self.slot(handle)?.player.as_ref()
    }

    /// Mutable player behind a live `handle`.
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut PlayerSnapshot> {
        self.slot_mut(handle)?.player.as_mut()
    }

    /// Add a sight-blocking box spanning `min` to `max`.
    pub fn add_wall(&mut self, min: Vec3, max: Vec3) {
        self.walls.push(Wall {
            min: min.min(max),
            max: min.max(max),
        });
    }

    /// Number of objectives that can be held at once.
    pub const fn set_objective_slots(&mut self, slots: usize) {
        self.objective_slots = slots;
    }

    /// Report `handle` as holding an objective.
    pub fn give_objective(&mut self, handle: EntityHandle) {
        self.carriers.push(handle);
    }

    /// Mark `handle` as infected.
    pub fn infect(&mut self, handle: EntityHandle) {
        if !self.infected.contains(&handle) {
            self.infected.push(handle);
        }
    }

    /// Last command applied to `bot`.
    #[must_use]
    pub fn last_command(&self, bot: EntityHandle) -> Option<&BotCommand> {
        self.commands.get(&bot)
    }

    /// Shot totals so far.
    #[must_use]
    pub const fn tally(&self) -> ShotTally {
        self.tally
    }

    /// Bring a dead player back at `origin` with full health.
    pub fn respawn(&mut self, handle: EntityHandle, origin: Vec3) -> bool {
        let Some(player) = self.get_mut(handle) else {
            return false;
        };
        player.origin = origin;
        player.velocity = Vec3::ZERO;
        player.health = 100;
        player.alive = true;
        true
    }

    /// Move living players along their velocity for `delta` seconds.
    pub fn advance(&mut self, delta: f32) {
        for player in self.slots.iter_mut().filter_map(|s| s.player.as_mut()) {
            if player.alive {
                player.origin += player.velocity * delta;
            }
        }
    }

    fn resolve_shot(&mut self, shooter: EntityHandle, weapon: WeaponKind, command: &BotCommand) {
        let Some(attacker) = self.get(shooter) else {
            return;
        };
        let (eye, team) = (attacker.eye_position(), attacker.team);
        let spec = weapon.spec();
        let dir = command.aim.forward();
        let reach = if spec.danger == DangerTier::Explosive {
            PLAYER_HULL_RADIUS + SPLASH_RADIUS
        } else {
            PLAYER_HULL_RADIUS
        };
        self.tally.shots += 1;

        let nearest = self
            .players()
            .into_iter()
            .filter(|&h| h != shooter)
            .filter_map(|h| self.get(h).map(|p| (h, p)))
            .filter(|(_, p)| p.alive && p.team != team)
            .filter_map(|(h, p)| {
                let to = hull_center(p.origin) - eye;
                let along = to.dot(dir);
                let distance = to.length();
                let miss = (to - dir * along).length();
                (along > 0.0 && distance <= spec.max_range && miss <= reach)
                    .then_some((h, distance))
            })
            .filter(|&(h, _)| {
                let Some(center) = self.get(h).map(|p| hull_center(p.origin)) else {
                    return false;
                };
                let trace = self.trace_line(eye, center, Some(shooter));
                !trace.blocked() || trace.hit == Some(h)
            })
            .min_by_key(|&(_, distance)| OrderedFloat(distance))
            .map(|(h, _)| h);

        let Some(victim) = nearest else {
            return;
        };
        self.tally.hits += 1;
        if let Some(player) = self.get_mut(victim) {
            player.health -= shot_damage(weapon);
            if player.health <= 0 {
                player.alive = false;
                self.tally.frags += 1;
                info!("{shooter} fragged {victim} with {weapon:?}");
            }
        }
    }
}

impl WorldQuery for Arena {
    fn trace_line(&self, start: Vec3, end: Vec3, ignore: Option<EntityHandle>) -> TraceResult {
        let mut best = TraceResult::CLEAR;
        for wall in &self.walls {
            if let Some(t) = segment_enters_box(start, end, wall.min, wall.max) {
                if t < best.fraction {
                    best = TraceResult {
                        fraction: t,
                        hit: None,
                    };
                }
            }
        }
        for handle in self.players() {
            if Some(handle) == ignore {
                continue;
            }
            let Some(player) = self.get(handle).filter(|p| p.alive) else {
                continue;
            };
            let center = hull_center(player.origin);
            if let Some(t) = segment_enters_sphere(start, end, center, PLAYER_HULL_RADIUS) {
                if t < best.fraction {
                    best = TraceResult {
                        fraction: t,
                        hit: Some(handle),
                    };
                }
            }
        }
        best
    }

    fn entity_is_valid(&self, entity: EntityHandle) -> bool {
        self.get(entity).is_some()
    }

    fn entity_origin(&self, entity: EntityHandle) -> Option<Vec3> {
        self.get(entity).map(|p| p.origin)
    }

    fn player(&self, entity: EntityHandle) -> Option<PlayerSnapshot> {
        self.get(entity).cloned()
    }

    fn players(&self) -> Vec<EntityHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.player.is_some())
            .filter_map(|(i, slot)| {
                u32::try_from(i)
                    .ok()
                    .map(|index| EntityHandle::new(index, slot.generation))
            })
            .collect()
    }
}

impl GameRules for Arena {
    fn team_count(&self) -> usize {
        self.team_count
    }

    fn objective_slots(&self) -> usize {
        self.objective_slots
    }

    fn objective_carriers(&self) -> Vec<EntityHandle> {
        self.carriers.clone()
    }

    fn infected(&self) -> Vec<EntityHandle> {
        self.infected.clone()
    }
}

impl ActuationSink for Arena {
    fn apply(&mut self, bot: EntityHandle, command: &BotCommand) {
        let Some(player) = self.get_mut(bot) else {
            return;
        };
        player.view = command.aim;
        if let Some((team, class)) = command.join {
            player.team = team;
            player.class = class;
        }
        if let Some(weapon) = command.weapon {
            player.weapon = Some(weapon);
        }
        if let (true, Some(weapon)) = (command.fire, command.weapon) {
            self.resolve_shot(bot, weapon, command);
        }
        self.commands.insert(bot, *command);
    }
}
