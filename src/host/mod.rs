//! External collaborator seams
//!
//! The behavior core never touches physics or finalizes positions itself.
//! It asks the host's collision provider about obstructions and obstacles,
//! and hands every desired displacement to the host's movement resolver,
//! which may constrain it before it becomes real.

pub mod flatland;

use crate::core::types::{EntityId, Vec3};

/// Opaque handle to a host-side obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleId(pub u32);

/// Collision/visibility queries answered by the host physics layer
pub trait CollisionQuery {
    /// Is the straight segment from `from` to `to` blocked by an obstacle?
    fn raycast_obstructed(&self, from: Vec3, to: Vec3) -> bool;

    /// Obstacles intersecting the sphere at `origin` with `radius`
    fn overlap_obstacles(&self, origin: Vec3, radius: f32) -> Vec<ObstacleId>;

    /// Closest point on the obstacle's surface to `point`
    fn closest_point(&self, obstacle: ObstacleId, point: Vec3) -> Vec3;

    /// Unobstructed line of sight between two points
    fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        !self.raycast_obstructed(from, to)
    }
}

/// Movement execution delegated to the host
pub trait MovementResolver {
    /// Realize a desired displacement, returning the final position.
    ///
    /// The host may clamp, slide or reject the displacement entirely.
    fn resolve_move(&mut self, entity: EntityId, from: Vec3, desired: Vec3) -> Vec3;
}
