//! Entity handles and the player facts the engine reads each tick.
use std::fmt;

use glam::Vec3;

use crate::engage::weapons::WeaponKind;
use crate::vector_math::ViewAngles;
use crate::EYE_HEIGHT;

/// Generation-tagged reference into the host's entity table.
///
/// A handle stays comparable after its entity is removed; resolving it then
/// fails because the slot's generation has moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle {
    index: u32,
    generation: u32,
}

impl EntityHandle {
    /// Handle for `index` at `generation`.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the entity table.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation the slot had when this handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Team colour of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Team {
    /// First playable team.
    Blue,
    /// Second playable team.
    Red,
    /// Third playable team, present on four-team maps.
    Yellow,
    /// Fourth playable team, present on four-team maps.
    Green,
    /// Observers; never an enemy and never picked as one.
    Spectator,
}

impl Team {
    /// Playable teams in index order.
    pub const PLAYABLE: [Self; 4] = [Self::Blue, Self::Red, Self::Yellow, Self::Green];

    /// Zero-based index of a playable team.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Blue => Some(0),
            Self::Red => Some(1),
            Self::Yellow => Some(2),
            Self::Green => Some(3),
            Self::Spectator => None,
        }
    }

    /// Playable team at `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::PLAYABLE.get(index).copied()
    }

    /// Whether the team takes part in play.
    #[must_use]
    pub const fn is_playable(self) -> bool {
        !matches!(self, Self::Spectator)
    }
}

/// Player class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerClass {
    /// Fast, lightly armed runner.
    Scout,
    /// Long-range marksman.
    Sniper,
    /// Rocket infantry.
    Soldier,
    /// Pipe and detpack specialist.
    Demoman,
    /// Healer that can infect enemies.
    Medic,
    /// Slow minigunner.
    Heavy,
    /// Flamethrower user.
    Pyro,
    /// Disguising infiltrator.
    Spy,
    /// Builder of sentries.
    Engineer,
    /// Unarmed escort class; never chosen automatically.
    Civilian,
}

impl PlayerClass {
    /// Every class, in selection order.
    pub const ALL: [Self; 10] = [
        Self::Scout,
        Self::Sniper,
        Self::Soldier,
        Self::Demoman,
        Self::Medic,
        Self::Heavy,
        Self::Pyro,
        Self::Spy,
        Self::Engineer,
        Self::Civilian,
    ];
}

/// What the host reports about one player for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    /// Team the player is on.
    pub team: Team,
    /// Class the player plays.
    pub class: PlayerClass,
    /// Feet position in world units.
    pub origin: Vec3,
    /// Units per second.
    pub velocity: Vec3,
    /// Direction the player faces.
    pub view: ViewAngles,
    /// Remaining health; zero or less means dead.
    pub health: i32,
    /// Whether the player is in play.
    pub alive: bool,
    /// Weapon currently held, if any.
    pub weapon: Option<WeaponKind>,
}

impl PlayerSnapshot {
    /// Living player of `class` on `team` at `origin`, facing `+x`.
    #[must_use]
    pub fn new(team: Team, class: PlayerClass, origin: Vec3) -> Self {
        Self {
            team,
            class,
            origin,
            velocity: Vec3::ZERO,
            view: ViewAngles::default(),
            health: 100,
            alive: true,
            weapon: WeaponKind::loadout(class).first().copied(),
        }
    }

    /// Point the player looks from.
    #[must_use]
    pub fn eye_position(&self) -> Vec3 {
        self.origin + Vec3::Z * EYE_HEIGHT
    }
}
