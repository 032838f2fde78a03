//! Per-bot state owned by the simulation's roster.
//!
//! A [`BotAgent`] lives from creation until the host removes the bot. Its
//! per-life fields are reset by [`crate::think::spawn_init`], its per-match
//! fields by [`crate::think::start_game`], and its per-tick scratch at the top
//! of every think.

use glam::Vec3;
use hashbrown::HashMap;

use crate::engage::grenade::{GrenadeKind, GrenadeSlot};
use crate::engage::weapons::WeaponKind;
use crate::entity::{EntityHandle, PlayerClass, PlayerSnapshot, Team};
use crate::threat::EnemyCandidate;
use crate::vector_math::ViewAngles;

/// Behavioural state of a bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    /// Dead or not yet initialised for the current life.
    Spawning,
    /// Alive with per-life state reset, before the first decision.
    Idle,
    /// No qualifying enemy; item seeking is delegated.
    Seeking,
    /// Fighting the current enemy.
    Engaging,
}

/// Creation parameters for a bot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BotProfile {
    /// Display name used in logs.
    pub name: String,
    /// Aim skill in `[0, 1]`; the configured default when `None`.
    pub skill: Option<f32>,
    /// Preferred team; balanced automatically when `None`.
    pub team: Option<Team>,
    /// Preferred class; the least represented class when `None`.
    pub class: Option<PlayerClass>,
}

impl BotProfile {
    /// Profile with automatic team and class.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Where and how an enemy was last seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    /// Origin when seen.
    pub position: Vec3,
    /// Velocity when seen.
    pub velocity: Vec3,
    /// Simulation time of the sighting.
    pub time: f32,
}

/// Weak reference to the enemy a bot is tracking.
///
/// The handle is revalidated against the world every time it is read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyMemory {
    /// Enemy being tracked.
    pub handle: EntityHandle,
    /// Most recent direct sighting.
    pub last_seen: Sighting,
}

/// A sound loud enough to draw attention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundHint {
    /// Entity that made the sound.
    pub source: EntityHandle,
    /// Where the source stood when heard.
    pub position: Vec3,
    /// Volume after distance falloff.
    pub volume: f32,
    /// Simulation time it was heard.
    pub time: f32,
}

/// A grenade held with its fuse running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimedGrenade {
    /// Grenade in hand.
    pub kind: GrenadeKind,
    /// Simulation time the fuse started.
    pub primed_at: f32,
    /// Point the throw aims for.
    pub target: Vec3,
    /// Throw as soon as the flight time matches the remaining fuse.
    pub timed: bool,
}

/// Ammunition and grenades carried in the current life.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inventory {
    weapons: Vec<WeaponKind>,
    ammo: HashMap<WeaponKind, u32>,
    primary_grenades: u32,
    secondary_grenades: u32,
}

impl Inventory {
    /// Spawn inventory for `class`.
    #[must_use]
    pub fn for_class(class: PlayerClass) -> Self {
        let weapons = WeaponKind::loadout(class).to_vec();
        let ammo = weapons
            .iter()
            .map(|&w| (w, w.spec().starting_ammo))
            .collect();
        let pouch = |slot: GrenadeSlot| {
            GrenadeKind::for_slot(class, slot).map_or(0, |_| slot.spawn_count())
        };
        Self {
            weapons,
            ammo,
            primary_grenades: pouch(GrenadeSlot::Primary),
            secondary_grenades: pouch(GrenadeSlot::Secondary),
        }
    }

    /// Weapons carried, in preference order.
    #[must_use]
    pub fn weapons(&self) -> &[WeaponKind] {
        &self.weapons
    }

    /// Whether `weapon` is carried.
    #[must_use]
    pub fn carries(&self, weapon: WeaponKind) -> bool {
        self.weapons.contains(&weapon)
    }

    /// Rounds left for `weapon`.
    #[must_use]
    pub fn ammo(&self, weapon: WeaponKind) -> u32 {
        self.ammo.get(&weapon).copied().unwrap_or(0)
    }

    /// Overwrite the rounds left for a carried `weapon`.
    pub fn set_ammo(&mut self, weapon: WeaponKind, rounds: u32) {
        if let Some(slot) = self.ammo.get_mut(&weapon) {
            *slot = rounds;
        }
    }

    /// Whether `weapon` is carried and can fire once.
    #[must_use]
    pub fn can_fire(&self, weapon: WeaponKind) -> bool {
        self.carries(weapon) && self.ammo(weapon) >= weapon.spec().ammo_per_shot
    }

    /// Whether any carried weapon can fire.
    #[must_use]
    pub fn any_fireable(&self) -> bool {
        self.weapons.iter().any(|&w| self.can_fire(w))
    }

    /// Spend one shot of `weapon`; returns `false` when out of ammo.
    pub fn consume(&mut self, weapon: WeaponKind) -> bool {
        if !self.can_fire(weapon) {
            return false;
        }
        let cost = weapon.spec().ammo_per_shot;
        if let Some(slot) = self.ammo.get_mut(&weapon) {
            *slot -= cost;
        }
        true
    }

    /// Grenades left in `slot`.
    #[must_use]
    pub const fn grenades(&self, slot: GrenadeSlot) -> u32 {
        match slot {
            GrenadeSlot::Primary => self.primary_grenades,
            GrenadeSlot::Secondary => self.secondary_grenades,
        }
    }

    const fn pouch_mut(&mut self, slot: GrenadeSlot) -> &mut u32 {
        match slot {
            GrenadeSlot::Primary => &mut self.primary_grenades,
            GrenadeSlot::Secondary => &mut self.secondary_grenades,
        }
    }

    /// Overwrite the grenades left in `slot`.
    pub const fn set_grenades(&mut self, slot: GrenadeSlot, count: u32) {
        *self.pouch_mut(slot) = count;
    }

    /// Take one grenade from `slot`; returns `false` when empty.
    pub const fn take_grenade(&mut self, slot: GrenadeSlot) -> bool {
        let count = self.pouch_mut(slot);
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }
}

/// Scratch data rebuilt every tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickScratch {
    /// Enemies found by this tick's scan.
    pub candidates: Vec<EnemyCandidate>,
    /// Weapon picked for this tick's shot.
    pub chosen_weapon: Option<WeaponKind>,
    /// Grenade picked this tick.
    pub chosen_grenade: Option<GrenadeKind>,
}

/// One controlled player.
#[derive(Debug, Clone, PartialEq)]
pub struct BotAgent {
    /// Player entity the bot controls.
    pub handle: EntityHandle,
    /// Display name used in logs.
    pub name: String,
    /// Aim skill in `[0, 1]`.
    pub skill: f32,
    /// Current behaviour.
    pub state: BotState,
    /// Team asked for in the profile.
    pub preferred_team: Option<Team>,
    /// Class asked for in the profile.
    pub preferred_class: Option<PlayerClass>,
    /// Team chosen at match start.
    pub team: Option<Team>,
    /// Opposing team whose ground the bot roams when idle.
    pub hunt_team: Option<Team>,
    /// Class chosen at match start.
    pub class: PlayerClass,
    /// Whether the join command has been issued.
    pub started: bool,
    /// Commanded aim.
    pub view: ViewAngles,
    /// Enemy being tracked, if any.
    pub enemy: Option<EnemyMemory>,
    /// Loudest recent sound worth investigating.
    pub sound: Option<SoundHint>,
    /// What the bot carries this life.
    pub inventory: Inventory,
    /// Grenade held with its fuse running.
    pub primed: Option<PrimedGrenade>,
    /// Simulation time of the last shot.
    pub last_fire_time: f32,
    /// Snapshot of the bot's own player, refreshed at the top of every think.
    pub me: Option<PlayerSnapshot>,
    /// Per-tick working data.
    pub scratch: TickScratch,
}

impl BotAgent {
    /// New agent for `handle`, waiting to spawn.
    #[must_use]
    pub fn new(handle: EntityHandle, profile: BotProfile, default_skill: f32) -> Self {
        let class = profile.class.unwrap_or(PlayerClass::Soldier);
        Self {
            handle,
            name: profile.name,
            skill: profile.skill.unwrap_or(default_skill).clamp(0.0, 1.0),
            state: BotState::Spawning,
            preferred_team: profile.team,
            preferred_class: profile.class,
            team: None,
            hunt_team: None,
            class,
            started: false,
            view: ViewAngles::default(),
            enemy: None,
            sound: None,
            inventory: Inventory::for_class(class),
            primed: None,
            last_fire_time: f32::NEG_INFINITY,
            me: None,
            scratch: TickScratch::default(),
        }
    }

    /// Eye position from the cached snapshot.
    #[must_use]
    pub fn eye_position(&self) -> Option<Vec3> {
        self.me.as_ref().map(PlayerSnapshot::eye_position)
    }

    /// Drop everything that only lives for one tick.
    pub fn clear_scratch(&mut self) {
        self.scratch.candidates.clear();
        self.scratch.chosen_weapon = None;
        self.scratch.chosen_grenade = None;
    }

    /// Forget the tracked enemy and any held grenade.
    pub fn disengage(&mut self) {
        self.enemy = None;
        self.primed = None;
        self.clear_scratch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_stops_at_empty() {
        let mut inv = Inventory::for_class(PlayerClass::Soldier);
        inv.set_ammo(WeaponKind::SuperShotgun, 3);
        assert!(inv.consume(WeaponKind::SuperShotgun));
        assert_eq!(inv.ammo(WeaponKind::SuperShotgun), 1);
        assert!(!inv.consume(WeaponKind::SuperShotgun));
        assert_eq!(inv.ammo(WeaponKind::SuperShotgun), 1);
    }

    #[test]
    fn melee_never_runs_dry() {
        let mut inv = Inventory::for_class(PlayerClass::Scout);
        for _ in 0..100 {
            assert!(inv.consume(WeaponKind::Crowbar));
        }
    }

    #[test]
    fn civilians_carry_no_grenades() {
        let inv = Inventory::for_class(PlayerClass::Civilian);
        assert_eq!(inv.grenades(GrenadeSlot::Primary), 0);
        assert_eq!(inv.grenades(GrenadeSlot::Secondary), 0);
    }

    #[test]
    fn uncarried_weapon_cannot_fire() {
        let inv = Inventory::for_class(PlayerClass::Scout);
        assert!(!inv.can_fire(WeaponKind::RocketLauncher));
    }
}
