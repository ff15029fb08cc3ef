//! Behavior states as explicit resumable values
//!
//! Each state carries exactly the data needed to resume where the previous
//! tick left off. Replacing the whole value is the only way to switch state,
//! so stale task data cannot outlive its state.

use crate::core::types::{EntityId, Vec3};
use serde::{Deserialize, Serialize};

/// Mutually exclusive behavior states; an entity is in exactly one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Transient resting point between states
    Idle,
    Wander(WanderTask),
    Pursue(PursueTask),
    Escape(EscapeTask),
}

impl Default for BehaviorState {
    fn default() -> Self {
        BehaviorState::Wander(WanderTask::default())
    }
}

impl BehaviorState {
    pub fn kind(&self) -> StateKind {
        match self {
            BehaviorState::Idle => StateKind::Idle,
            BehaviorState::Wander(_) => StateKind::Wander,
            BehaviorState::Pursue(_) => StateKind::Pursue,
            BehaviorState::Escape(_) => StateKind::Escape,
        }
    }
}

/// State discriminant for events and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKind {
    Idle,
    Wander,
    Pursue,
    Escape,
}

/// Wander alternates between pausing and walking a chosen heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WanderPhase {
    /// Standing still until the deadline
    Paused { until: f32 },
    /// Walking the heading until the deadline
    Walking { heading: Vec3, until: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WanderTask {
    pub phase: WanderPhase,
}

impl Default for WanderTask {
    fn default() -> Self {
        // Expired deadline: the first tick picks a fresh pause
        Self {
            phase: WanderPhase::Paused { until: 0.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PursueTask {
    pub target: EntityId,
}

/// Escape reads its attacker set from the entity's attacked-by list, so the
/// task itself carries no data
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EscapeTask;

/// A state switch requested by the hostility policy or the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    ToWander,
    ToPursue(EntityId),
    ToEscape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_wander() {
        assert_eq!(BehaviorState::default().kind(), StateKind::Wander);
    }

    #[test]
    fn test_fresh_wander_starts_paused_expired() {
        let task = WanderTask::default();
        match task.phase {
            WanderPhase::Paused { until } => assert_eq!(until, 0.0),
            _ => panic!("expected paused phase"),
        }
    }
}
