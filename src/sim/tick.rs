//! Tick system - orchestrates simulation updates
//!
//! One call advances every live entity by one step, in stable spawn order.
//! Per entity the order is fixed: target acquisition, state advance
//! (movement and combat), then passive regeneration. A failed entity step
//! is logged and skipped; it never halts the rest of the tick.

use crate::behavior::controller::step_entity;
use crate::behavior::state::StateKind;
use crate::core::types::{EntityId, Tick};
use crate::host::{CollisionQuery, MovementResolver};
use crate::sim::world::World;
use serde::Serialize;

/// Events generated during a simulation tick, for logs and UIs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationEvent {
    /// An entity switched behavior state
    StateChanged {
        entity: EntityId,
        from: StateKind,
        to: StateKind,
        tick: Tick,
    },
    /// An attack connected
    AttackLanded {
        attacker: EntityId,
        target: EntityId,
        damage: f32,
        tick: Tick,
    },
    /// An entity's health reached zero and it left the registry
    EntityDied {
        entity: EntityId,
        killer: Option<EntityId>,
        tick: Tick,
    },
    /// A chicken's egg timer elapsed
    EggsLaid { entity: EntityId, tick: Tick },
}

/// Advance the whole simulation by one host timestep.
pub fn run_simulation_tick<H>(world: &mut World, host: &mut H, dt: f32) -> Vec<SimulationEvent>
where
    H: CollisionQuery + MovementResolver,
{
    let mut events = Vec::new();

    world.advance_clock(dt);
    let config = world.config.clone();

    // Snapshot of the stable order; entities despawned mid-tick are simply
    // absent when their turn comes
    for id in world.ids_in_order() {
        if let Err(error) = step_entity(world, host, &config, id, dt, &mut events) {
            tracing::warn!(?id, %error, "entity step failed; continuing tick");
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimConfig;
    use crate::core::types::Vec3;
    use crate::entity::species::Species;
    use crate::host::flatland::Flatland;

    #[test]
    fn test_tick_advances_clock() {
        let mut world = World::new(SimConfig::default(), 42);
        let mut field = Flatland::new();
        run_simulation_tick(&mut world, &mut field, 0.1);
        assert_eq!(world.current_tick, 1);
        assert!((world.now - 0.1).abs() < 0.0001);
    }

    #[test]
    fn test_lone_wanderer_moves_eventually() {
        let mut world = World::new(SimConfig::default(), 42);
        let mut field = Flatland::new();
        let id = world.spawn("drifter", Species::Human, Vec3::ZERO);

        for _ in 0..200 {
            run_simulation_tick(&mut world, &mut field, 0.1);
        }
        let entity = world.get(id).unwrap();
        assert!(entity.position.distance(&Vec3::ZERO) > 0.1);
        assert!(entity.is_alive());
    }

    #[test]
    fn test_chicken_lays_eggs_on_interval() {
        let mut config = SimConfig::default();
        config.egg_interval = 1.0;
        let mut world = World::new(config, 42);
        let mut field = Flatland::new();
        world.spawn("hen", Species::Chicken, Vec3::ZERO);

        let mut eggs = 0;
        for _ in 0..50 {
            let events = run_simulation_tick(&mut world, &mut field, 0.1);
            eggs += events
                .iter()
                .filter(|e| matches!(e, SimulationEvent::EggsLaid { .. }))
                .count();
        }
        // 5 seconds with a 1s interval, first second arms the timer
        assert!(eggs >= 3, "expected several egg events, got {eggs}");
    }
}
