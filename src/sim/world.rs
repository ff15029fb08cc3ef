//! World: the simulation-owned state container
//!
//! Owns the entity registry, the config, the clock and the seeded RNG. The
//! registry is mutated only at spawn/despawn; per-entity ticks read it and
//! mutate other entities solely through the damage/knockback paths in the
//! behavior controller.

use crate::core::config::SimConfig;
use crate::core::types::{EntityId, Tick, Vec3};
use crate::entity::species::Species;
use crate::entity::Entity;
use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct World {
    pub config: SimConfig,
    /// Monotonic simulation time in seconds
    pub now: f32,
    pub current_tick: Tick,
    /// Deterministic RNG for wander headings and durations
    pub rng: ChaCha8Rng,

    entities: AHashMap<EntityId, Entity>,
    /// Spawn order; defines the stable per-tick iteration order
    order: Vec<EntityId>,
}

impl World {
    pub fn new(config: SimConfig, seed: u64) -> Self {
        Self {
            config,
            now: 0.0,
            current_tick: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            entities: AHashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn spawn(&mut self, name: impl Into<String>, species: Species, position: Vec3) -> EntityId {
        let entity = Entity::new(name, species, position);
        let id = entity.id;
        self.entities.insert(id, entity);
        self.order.push(id);
        tracing::debug!(?id, species = species.name(), "spawned entity");
        id
    }

    /// Insert a pre-built entity (tests and custom hostility setups)
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        self.order.push(id);
        id
    }

    /// Remove an entity from the live registry immediately.
    ///
    /// Holders of its id recover on their next tick; nothing is notified.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.order.retain(|&e| e != id);
        self.entities.remove(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Take an entity out of the registry for its own step.
    ///
    /// While taken, the entity is invisible to queries, which is exactly
    /// the exclude-self behavior every self-query wants.
    pub(crate) fn take(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub(crate) fn put_back(&mut self, entity: Entity) {
        self.entities.insert(entity.id, entity);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Live entity ids in stable spawn order
    pub fn ids_in_order(&self) -> Vec<EntityId> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Advance the clock by one host-supplied timestep
    pub fn advance_clock(&mut self, dt: f32) {
        self.now += dt;
        self.current_tick += 1;
    }
}
