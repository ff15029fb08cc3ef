//! Proximity and visibility queries over the entity registry
//!
//! A linear scan with distance filtering; the sorted mode answers the one
//! question callers actually ask of it ("who is closest") rather than
//! returning a fully ordered set. Dead or missing entries are skipped, never
//! faulted on: the registry may contain entities despawned later this tick.

use crate::core::types::{EntityId, Vec3};
use crate::host::CollisionQuery;
use crate::sim::world::World;

/// All live entities within `radius` of `origin`, unordered.
pub fn entities_within(
    world: &World,
    origin: Vec3,
    radius: f32,
    exclude: Option<EntityId>,
) -> Vec<EntityId> {
    world
        .iter()
        .filter(|e| e.is_alive())
        .filter(|e| Some(e.id) != exclude)
        .filter(|e| e.position.distance(&origin) <= radius)
        .map(|e| e.id)
        .collect()
}

/// The single nearest live entity within `radius` of `origin`.
pub fn nearest_within(
    world: &World,
    origin: Vec3,
    radius: f32,
    exclude: Option<EntityId>,
) -> Option<EntityId> {
    world
        .iter()
        .filter(|e| e.is_alive())
        .filter(|e| Some(e.id) != exclude)
        .map(|e| (e.id, e.position.distance(&origin)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// `entities_within`, additionally requiring unobstructed line of sight.
pub fn visible_within<C: CollisionQuery>(
    world: &World,
    collision: &C,
    origin: Vec3,
    radius: f32,
    exclude: Option<EntityId>,
) -> Vec<EntityId> {
    world
        .iter()
        .filter(|e| e.is_alive())
        .filter(|e| Some(e.id) != exclude)
        .filter(|e| e.position.distance(&origin) <= radius)
        .filter(|e| collision.has_line_of_sight(origin, e.position))
        .map(|e| e.id)
        .collect()
}

/// The nearest live entity that is both in radius and in line of sight,
/// restricted by an arbitrary candidate filter.
pub fn nearest_visible<C, F>(
    world: &World,
    collision: &C,
    origin: Vec3,
    radius: f32,
    exclude: Option<EntityId>,
    mut accept: F,
) -> Option<EntityId>
where
    C: CollisionQuery,
    F: FnMut(&crate::entity::Entity) -> bool,
{
    world
        .iter()
        .filter(|e| e.is_alive())
        .filter(|e| Some(e.id) != exclude)
        .filter(|e| accept(e))
        .map(|e| (e.id, e.position, e.position.distance(&origin)))
        .filter(|(_, _, d)| *d <= radius)
        .filter(|(_, pos, _)| collision.has_line_of_sight(origin, *pos))
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(id, _, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimConfig;
    use crate::entity::species::Species;
    use crate::host::flatland::Flatland;

    fn world_with(positions: &[Vec3]) -> (World, Vec<EntityId>) {
        let mut world = World::new(SimConfig::default(), 1);
        let ids = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| world.spawn(format!("e{i}"), Species::Human, p))
            .collect();
        (world, ids)
    }

    #[test]
    fn test_radius_filters_and_excludes_self() {
        let (world, ids) = world_with(&[
            Vec3::ZERO,
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(50.0, 0.0, 0.0),
        ]);
        let found = entities_within(&world, Vec3::ZERO, 10.0, Some(ids[0]));
        assert_eq!(found, vec![ids[1]]);
    }

    #[test]
    fn test_nearest_picks_closest_of_many() {
        let (world, ids) = world_with(&[
            Vec3::new(8.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
        ]);
        assert_eq!(nearest_within(&world, Vec3::ZERO, 10.0, None), Some(ids[1]));
    }

    #[test]
    fn test_nearest_none_when_empty_radius() {
        let (world, _) = world_with(&[Vec3::new(30.0, 0.0, 0.0)]);
        assert_eq!(nearest_within(&world, Vec3::ZERO, 10.0, None), None);
    }

    #[test]
    fn test_dead_entities_skipped() {
        let (mut world, ids) = world_with(&[Vec3::new(2.0, 0.0, 0.0)]);
        world.get_mut(ids[0]).unwrap().stats.health = 0.0;
        assert!(entities_within(&world, Vec3::ZERO, 10.0, None).is_empty());
    }

    #[test]
    fn test_visibility_filter_drops_occluded() {
        let (world, ids) = world_with(&[
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
        ]);
        // Wall between origin and the first entity
        let field = Flatland::new().with_obstacle(Vec3::new(5.0, 0.0, 0.0), 1.0);
        let seen = visible_within(&world, &field, Vec3::ZERO, 20.0, None);
        assert_eq!(seen, vec![ids[1]]);
    }

    #[test]
    fn test_nearest_visible_respects_filter() {
        let (world, ids) = world_with(&[
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        ]);
        let field = Flatland::new();
        let skip = ids[0];
        let found = nearest_visible(&world, &field, Vec3::ZERO, 20.0, None, |e| e.id != skip);
        assert_eq!(found, Some(ids[1]));
    }
}
