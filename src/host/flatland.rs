//! Open-field host: an unbounded plane with sphere obstacles
//!
//! The simplest host that exercises every collaborator seam. Used by the
//! driver binary and the integration tests; a real engine supplies its own
//! implementations instead.

use crate::core::types::{EntityId, Vec3};
use crate::host::{CollisionQuery, MovementResolver, ObstacleId};

/// A static sphere obstacle
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Flat terrain with sphere obstacles; displacements apply unmodified
#[derive(Debug, Default)]
pub struct Flatland {
    obstacles: Vec<Sphere>,
}

impl Flatland {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obstacle(mut self, center: Vec3, radius: f32) -> Self {
        self.obstacles.push(Sphere { center, radius });
        self
    }

    /// Distance from segment ab to point, for sphere intersection tests
    fn segment_distance(a: Vec3, b: Vec3, point: Vec3) -> f32 {
        let ab = b - a;
        let len_sq = ab.dot(&ab);
        if len_sq < 0.0001 {
            return a.distance(&point);
        }
        let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
        (a + ab * t).distance(&point)
    }
}

impl CollisionQuery for Flatland {
    fn raycast_obstructed(&self, from: Vec3, to: Vec3) -> bool {
        self.obstacles
            .iter()
            .any(|s| Self::segment_distance(from, to, s.center) <= s.radius)
    }

    fn overlap_obstacles(&self, origin: Vec3, radius: f32) -> Vec<ObstacleId> {
        self.obstacles
            .iter()
            .enumerate()
            .filter(|(_, s)| s.center.distance(&origin) <= s.radius + radius)
            .map(|(i, _)| ObstacleId(i as u32))
            .collect()
    }

    fn closest_point(&self, obstacle: ObstacleId, point: Vec3) -> Vec3 {
        let Some(sphere) = self.obstacles.get(obstacle.0 as usize) else {
            return point;
        };
        let dir = (point - sphere.center).normalize();
        if dir == Vec3::ZERO {
            sphere.center
        } else {
            sphere.center + dir * sphere.radius
        }
    }
}

impl MovementResolver for Flatland {
    fn resolve_move(&mut self, _entity: EntityId, from: Vec3, desired: Vec3) -> Vec3 {
        from + desired
    }
}
