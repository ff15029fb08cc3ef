//! Entity: one simulated creature
//!
//! An entity owns its stat block and behavior state. Target and attacker
//! fields hold ids only; the referenced entity may be destroyed at any time
//! and holders recover lazily when the lookup fails.

pub mod species;
pub mod stats;

use crate::behavior::state::BehaviorState;
use crate::core::cooldown::NEVER;
use crate::core::types::{EntityId, HostilityLevel, Vec3};
use crate::entity::species::Species;
use crate::entity::stats::StatBlock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub species: Species,
    /// Fixed at spawn; never changes for a live entity
    pub hostility: HostilityLevel,

    pub position: Vec3,
    /// Unit vector the entity is facing; movement turns it smoothly
    pub facing: Vec3,

    pub stats: StatBlock,
    pub state: BehaviorState,

    /// Current chase target, if any (weak reference)
    pub target: Option<EntityId>,
    /// Entities currently attacking this one (weak references, deduplicated)
    pub attacked_by: Vec<EntityId>,

    pub kills: u32,
    pub experience: f32,

    /// Last egg-laying time (chickens only)
    pub egg_timestamp: f32,
}

impl Entity {
    pub fn new(name: impl Into<String>, species: Species, position: Vec3) -> Self {
        let mut stats = species.base_stats();
        stats.clamp_to_bounds();
        Self {
            id: EntityId::new(),
            name: name.into(),
            species,
            hostility: species.default_hostility(),
            position,
            facing: Vec3::new(0.0, 0.0, 1.0),
            stats,
            state: BehaviorState::default(),
            target: None,
            attacked_by: Vec::new(),
            kills: 0,
            experience: 0.0,
            egg_timestamp: NEVER,
        }
    }

    /// Override the spawn disposition (e.g. a tamed zombie for tests)
    pub fn with_hostility(mut self, hostility: HostilityLevel) -> Self {
        self.hostility = hostility;
        self
    }

    /// Record an attacker. Duplicates and self-references are dropped.
    pub fn record_attacker(&mut self, attacker: EntityId) {
        if attacker == self.id {
            return;
        }
        if !self.attacked_by.contains(&attacker) {
            self.attacked_by.push(attacker);
        }
    }

    pub fn forget_attacker(&mut self, attacker: EntityId) {
        self.attacked_by.retain(|&a| a != attacker);
    }

    pub fn is_alive(&self) -> bool {
        !self.stats.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attacker_list_deduplicates() {
        let mut entity = Entity::new("a", Species::Human, Vec3::ZERO);
        let attacker = EntityId::new();
        entity.record_attacker(attacker);
        entity.record_attacker(attacker);
        assert_eq!(entity.attacked_by.len(), 1);
    }

    #[test]
    fn test_attacker_list_never_contains_self() {
        let mut entity = Entity::new("a", Species::Human, Vec3::ZERO);
        let own_id = entity.id;
        entity.record_attacker(own_id);
        assert!(entity.attacked_by.is_empty());
    }

    #[test]
    fn test_spawn_uses_species_hostility() {
        let zombie = Entity::new("z", Species::Zombie, Vec3::ZERO);
        assert_eq!(zombie.hostility, HostilityLevel::Hostile);
        assert!(zombie.is_alive());
    }
}
