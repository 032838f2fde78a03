//! Team membership, class counts and the objective-carrier registry.

use hashbrown::HashSet;
use log::warn;

use crate::entity::{EntityHandle, PlayerClass, Team};
use crate::world::{GameRules, WorldQuery};

/// Team of `entity`, or `None` when it is stale or not a player.
#[must_use]
pub fn team_color_check(world: &dyn WorldQuery, entity: EntityHandle) -> Option<Team> {
    world.player(entity).map(|p| p.team)
}

/// Number of living players on `entity`'s team playing `class`.
///
/// Dead teammates are not counted. `entity` itself is left out when
/// `ignore_self` is set. A stale `entity` has no team and counts nothing.
#[must_use]
pub fn friendly_class_total(
    world: &dyn WorldQuery,
    entity: EntityHandle,
    class: PlayerClass,
    ignore_self: bool,
) -> usize {
    let Some(team) = team_color_check(world, entity) else {
        return 0;
    };
    let skip = ignore_self.then_some(entity);
    world
        .players()
        .into_iter()
        .filter(|&h| Some(h) != skip)
        .filter_map(|h| world.player(h))
        .filter(|p| p.alive && p.team == team && p.class == class)
        .count()
}

/// Number of connected players on `team` playing `class`, leaving out `skip`.
///
/// Dead players still hold their class, so class selection counts them.
#[must_use]
pub fn team_class_total(
    world: &dyn WorldQuery,
    team: Team,
    class: PlayerClass,
    skip: Option<EntityHandle>,
) -> usize {
    world
        .players()
        .into_iter()
        .filter(|&h| Some(h) != skip)
        .filter_map(|h| world.player(h))
        .filter(|p| p.team == team && p.class == class)
        .count()
}

/// Number of living players on `team`, leaving out `skip`.
#[must_use]
pub fn living_team_total(world: &dyn WorldQuery, team: Team, skip: Option<EntityHandle>) -> usize {
    world
        .players()
        .into_iter()
        .filter(|&h| Some(h) != skip)
        .filter_map(|h| world.player(h))
        .filter(|p| p.alive && p.team == team)
        .count()
}

/// Which entities hold an objective and which are infected.
///
/// Rebuilt from the rules engine once per frame. Rebuilding from the same
/// inputs always yields the same registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarrierRegistry {
    carriers: Vec<EntityHandle>,
    carrier_set: HashSet<EntityHandle>,
    infected: HashSet<EntityHandle>,
}

impl CarrierRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the rules engine.
    ///
    /// Stale handles are dropped, duplicates collapse, and carriers beyond
    /// the rules' slot count are discarded in report order.
    pub fn update(&mut self, world: &dyn WorldQuery, rules: &dyn GameRules) {
        let slots = rules.objective_slots();
        self.carriers.clear();
        self.carrier_set.clear();
        for handle in rules.objective_carriers() {
            if !world.entity_is_valid(handle) {
                warn!("dropping stale objective carrier {handle}");
                continue;
            }
            if !self.carrier_set.insert(handle) {
                continue;
            }
            if self.carriers.len() == slots {
                self.carrier_set.remove(&handle);
                warn!("objective carrier {handle} exceeds {slots} slot(s); ignored");
                continue;
            }
            self.carriers.push(handle);
        }

        self.infected.clear();
        self.infected.extend(
            rules
                .infected()
                .into_iter()
                .filter(|&h| world.entity_is_valid(h)),
        );
    }

    /// Whether `entity` holds an objective.
    #[must_use]
    pub fn has_flag(&self, entity: EntityHandle) -> bool {
        self.carrier_set.contains(&entity)
    }

    /// Whether `entity` is infected.
    #[must_use]
    pub fn is_infected(&self, entity: EntityHandle) -> bool {
        self.infected.contains(&entity)
    }

    /// Current carriers in report order.
    #[must_use]
    pub fn carriers(&self) -> &[EntityHandle] {
        &self.carriers
    }
}
