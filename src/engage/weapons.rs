//! Weapon table and per-class loadouts.
//!
//! Loadouts list weapons in preference order; automatic selection walks the
//! list and takes the first weapon whose range band covers the target.

use crate::entity::PlayerClass;

/// Every weapon a bot can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    /// Default melee weapon.
    Crowbar,
    /// Spy melee.
    Knife,
    /// Engineer melee.
    Spanner,
    /// Medic melee; infects enemies.
    Medikit,
    /// Civilian melee.
    Umbrella,
    /// Single-barrel shotgun.
    Shotgun,
    /// Double-barrel shotgun.
    SuperShotgun,
    /// Light nail projectile gun.
    Nailgun,
    /// Heavy nail projectile gun.
    SuperNailgun,
    /// Soldier rockets.
    RocketLauncher,
    /// Demoman grenades and pipes.
    GrenadeLauncher,
    /// Charged long-range shot.
    SniperRifle,
    /// Sniper's automatic fallback.
    AutoRifle,
    /// Heavy minigun.
    AssaultCannon,
    /// Short-range flame.
    Flamethrower,
    /// Pyro rockets.
    IncendiaryCannon,
    /// Spy dart gun.
    Tranquilizer,
    /// Engineer rail shot.
    Railgun,
}

/// Coarse danger classification used by threat scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerTier {
    /// Only dangerous up close.
    Melee,
    /// Low damage per hit.
    Light,
    /// Few shots, each one deadly.
    Precision,
    /// Sustained high damage.
    Heavy,
    /// Splash damage.
    Explosive,
}

impl DangerTier {
    /// Contribution of the tier to a threat score.
    #[must_use]
    pub const fn weight(self) -> f32 {
        match self {
            Self::Melee => 10.0,
            Self::Light => 18.0,
            Self::Precision => 28.0,
            Self::Heavy => 30.0,
            Self::Explosive => 36.0,
        }
    }
}

/// Static handling characteristics of a weapon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    /// Closest distance the weapon is used at.
    pub min_range: f32,
    /// Farthest distance the weapon is used at.
    pub max_range: f32,
    /// Seconds between shots.
    pub refire: f32,
    /// Ammunition consumed per shot; `0` for melee.
    pub ammo_per_shot: u32,
    /// Aim error, in degrees, within which a shot is taken.
    pub cone: f32,
    /// Projectile speed in units per second; `0` for hitscan and melee.
    pub projectile_speed: f32,
    /// Whether the weapon strikes rather than shoots.
    pub melee: bool,
    /// Threat class of the weapon.
    pub danger: DangerTier,
    /// Ammunition issued on spawn.
    pub starting_ammo: u32,
}

const fn melee() -> WeaponSpec {
    WeaponSpec {
        min_range: 0.0,
        max_range: 64.0,
        refire: 0.4,
        ammo_per_shot: 0,
        cone: 20.0,
        projectile_speed: 0.0,
        melee: true,
        danger: DangerTier::Melee,
        starting_ammo: 0,
    }
}

#[expect(
    clippy::too_many_arguments,
    reason = "Mirrors one row of the weapon table."
)]
const fn ranged(
    min_range: f32,
    max_range: f32,
    refire: f32,
    ammo_per_shot: u32,
    cone: f32,
    projectile_speed: f32,
    danger: DangerTier,
    starting_ammo: u32,
) -> WeaponSpec {
    WeaponSpec {
        min_range,
        max_range,
        refire,
        ammo_per_shot,
        cone,
        projectile_speed,
        melee: false,
        danger,
        starting_ammo,
    }
}

impl WeaponKind {
    /// Handling characteristics of this weapon.
    #[must_use]
    pub const fn spec(self) -> WeaponSpec {
        use DangerTier::{Explosive, Heavy, Light, Precision};
        match self {
            Self::Crowbar | Self::Knife | Self::Spanner | Self::Medikit | Self::Umbrella => {
                melee()
            }
            Self::Shotgun => ranged(0.0, 1200.0, 0.5, 1, 8.0, 0.0, Light, 50),
            Self::SuperShotgun => ranged(0.0, 900.0, 0.7, 2, 10.0, 0.0, Heavy, 50),
            Self::Nailgun => ranged(0.0, 1500.0, 0.1, 1, 5.0, 1000.0, Light, 200),
            Self::SuperNailgun => ranged(0.0, 1500.0, 0.1, 2, 5.0, 1000.0, Heavy, 200),
            Self::RocketLauncher => ranged(150.0, 2000.0, 0.8, 1, 6.0, 900.0, Explosive, 30),
            Self::GrenadeLauncher => ranged(200.0, 1200.0, 0.6, 1, 10.0, 800.0, Explosive, 30),
            Self::SniperRifle => ranged(300.0, 8000.0, 1.5, 1, 2.0, 0.0, Precision, 50),
            Self::AutoRifle => ranged(0.0, 2000.0, 0.1, 1, 4.0, 0.0, Light, 100),
            Self::AssaultCannon => ranged(0.0, 1600.0, 0.1, 1, 6.0, 0.0, Heavy, 200),
            Self::Flamethrower => ranged(0.0, 400.0, 0.15, 1, 15.0, 600.0, Heavy, 200),
            Self::IncendiaryCannon => {
                ranged(200.0, 1500.0, 1.2, 3, 6.0, 600.0, Explosive, 40)
            }
            Self::Tranquilizer => ranged(0.0, 1500.0, 1.5, 1, 4.0, 1500.0, Light, 40),
            Self::Railgun => ranged(0.0, 1500.0, 0.4, 1, 5.0, 2000.0, Light, 50),
        }
    }

    /// Whether `distance` lies within the weapon's range band.
    #[must_use]
    pub const fn covers(self, distance: f32) -> bool {
        let spec = self.spec();
        distance >= spec.min_range && distance <= spec.max_range
    }

    /// Weapons issued to `class`, in preference order.
    #[must_use]
    pub const fn loadout(class: PlayerClass) -> &'static [Self] {
        match class {
            PlayerClass::Scout => &[Self::Nailgun, Self::Shotgun, Self::Crowbar],
            PlayerClass::Sniper => &[
                Self::SniperRifle,
                Self::AutoRifle,
                Self::Nailgun,
                Self::Crowbar,
            ],
            PlayerClass::Soldier => &[
                Self::RocketLauncher,
                Self::SuperShotgun,
                Self::Shotgun,
                Self::Crowbar,
            ],
            PlayerClass::Demoman => &[Self::GrenadeLauncher, Self::Shotgun, Self::Crowbar],
            PlayerClass::Medic => &[
                Self::SuperNailgun,
                Self::SuperShotgun,
                Self::Shotgun,
                Self::Medikit,
            ],
            PlayerClass::Heavy => &[
                Self::AssaultCannon,
                Self::SuperShotgun,
                Self::Shotgun,
                Self::Crowbar,
            ],
            PlayerClass::Pyro => &[
                Self::Flamethrower,
                Self::IncendiaryCannon,
                Self::Shotgun,
                Self::Crowbar,
            ],
            PlayerClass::Spy => &[
                Self::Tranquilizer,
                Self::SuperShotgun,
                Self::Nailgun,
                Self::Knife,
            ],
            PlayerClass::Engineer => &[Self::Railgun, Self::SuperShotgun, Self::Spanner],
            PlayerClass::Civilian => &[Self::Umbrella],
        }
    }
}
