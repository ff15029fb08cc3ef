//! Hostility policy: the single authoritative decision table
//!
//! Every hostility-dependent reaction resolves through `react`. Nothing else
//! in the codebase branches on hostility level for transitions, so the table
//! below is the whole story:
//!
//! | Level    | Attacked (healthy) | Attacked (low health) | Target sighted |
//! |----------|--------------------|-----------------------|----------------|
//! | Friendly | Escape             | Escape                | none           |
//! | Neutral  | Pursue attacker    | Escape                | none           |
//! | Hostile  | Pursue attacker    | Pursue attacker       | Pursue         |

use crate::behavior::state::Transition;
use crate::core::types::{EntityId, HostilityLevel};

/// An incoming stimulus the policy decides on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BehaviorEvent {
    /// This entity was just damaged by `attacker`
    Attacked { attacker: EntityId },
    /// A hostile entity's visibility query found `target` unprovoked
    TargetSighted { target: EntityId },
}

/// Resolve a stimulus into a state transition, or `None` to stay put.
pub fn react(
    hostility: HostilityLevel,
    is_low_health: bool,
    event: BehaviorEvent,
) -> Option<Transition> {
    match (hostility, event) {
        (HostilityLevel::Friendly, BehaviorEvent::Attacked { .. }) => Some(Transition::ToEscape),

        (HostilityLevel::Neutral, BehaviorEvent::Attacked { attacker }) => {
            if is_low_health {
                // Abandons any current pursuit
                Some(Transition::ToEscape)
            } else {
                Some(Transition::ToPursue(attacker))
            }
        }

        (HostilityLevel::Hostile, BehaviorEvent::Attacked { attacker }) => {
            Some(Transition::ToPursue(attacker))
        }

        (HostilityLevel::Hostile, BehaviorEvent::TargetSighted { target }) => {
            Some(Transition::ToPursue(target))
        }

        // Friendly and neutral entities never acquire targets unprovoked
        (_, BehaviorEvent::TargetSighted { .. }) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attacked() -> BehaviorEvent {
        BehaviorEvent::Attacked {
            attacker: EntityId::new(),
        }
    }

    #[test]
    fn test_friendly_always_flees() {
        assert_eq!(
            react(HostilityLevel::Friendly, false, attacked()),
            Some(Transition::ToEscape)
        );
        assert_eq!(
            react(HostilityLevel::Friendly, true, attacked()),
            Some(Transition::ToEscape)
        );
    }

    #[test]
    fn test_neutral_fights_back_until_low() {
        let attacker = EntityId::new();
        let event = BehaviorEvent::Attacked { attacker };
        assert_eq!(
            react(HostilityLevel::Neutral, false, event),
            Some(Transition::ToPursue(attacker))
        );
        assert_eq!(
            react(HostilityLevel::Neutral, true, event),
            Some(Transition::ToEscape)
        );
    }

    #[test]
    fn test_hostile_pursues_unconditionally() {
        let attacker = EntityId::new();
        let event = BehaviorEvent::Attacked { attacker };
        assert_eq!(
            react(HostilityLevel::Hostile, true, event),
            Some(Transition::ToPursue(attacker))
        );
    }

    #[test]
    fn test_only_hostile_acquires_on_sight() {
        let target = EntityId::new();
        let event = BehaviorEvent::TargetSighted { target };
        assert_eq!(
            react(HostilityLevel::Hostile, false, event),
            Some(Transition::ToPursue(target))
        );
        assert_eq!(react(HostilityLevel::Neutral, false, event), None);
        assert_eq!(react(HostilityLevel::Friendly, false, event), None);
    }
}
