//! Species and their stat presets
//!
//! Species differ only by parameterization of the shared stat block and by
//! their default disposition; the behavior state machine is identical for
//! all of them.

use crate::core::types::HostilityLevel;
use crate::entity::stats::StatBlock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Human,
    Zombie,
    Chicken,
    Horse,
}

impl Species {
    pub fn default_hostility(&self) -> HostilityLevel {
        match self {
            Species::Human => HostilityLevel::Neutral,
            Species::Zombie => HostilityLevel::Hostile,
            Species::Chicken => HostilityLevel::Friendly,
            Species::Horse => HostilityLevel::Neutral,
        }
    }

    /// Baseline stat block for the species
    pub fn base_stats(&self) -> StatBlock {
        match self {
            Species::Human => StatBlock::default(),

            Species::Zombie => StatBlock {
                speed: 2.0,
                run_speed: 4.5,
                attack_damage: 15.0,
                attack_range: 2.0,
                ..Default::default()
            },

            Species::Chicken => StatBlock {
                health: 15.0,
                max_health: 15.0,
                // Hysteresis band scaled down with the health pool
                low_health_enter: 4.0,
                low_health_exit: 8.0,
                attack_damage: 1.0,
                attack_range: 0.5,
                visibility_range: 10.0,
                speed: 2.0,
                run_speed: 4.0,
                knockback_force: 1.0,
                ..Default::default()
            },

            // Horses ride on the human baseline with flat multipliers.
            Species::Horse => {
                let base = StatBlock::default();
                StatBlock {
                    speed: base.speed * HORSE_SPEED_BOOST,
                    run_speed: base.run_speed * HORSE_SPEED_BOOST,
                    max_stamina: base.max_stamina * HORSE_STAMINA_BOOST,
                    stamina: base.max_stamina * HORSE_STAMINA_BOOST,
                    ..base
                }
            }
        }
    }

    /// Multiplier on stamina drained while running
    pub fn stamina_drain_factor(&self) -> f32 {
        match self {
            Species::Horse => HORSE_STAMINA_LOSS_REDUCTION,
            _ => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Human => "human",
            Species::Zombie => "zombie",
            Species::Chicken => "chicken",
            Species::Horse => "horse",
        }
    }
}

const HORSE_SPEED_BOOST: f32 = 1.25;
const HORSE_STAMINA_BOOST: f32 = 1.2;
const HORSE_STAMINA_LOSS_REDUCTION: f32 = 0.8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hostilities() {
        assert_eq!(Species::Zombie.default_hostility(), HostilityLevel::Hostile);
        assert_eq!(Species::Human.default_hostility(), HostilityLevel::Neutral);
        assert_eq!(
            Species::Chicken.default_hostility(),
            HostilityLevel::Friendly
        );
    }

    #[test]
    fn test_horse_outruns_human() {
        let horse = Species::Horse.base_stats();
        let human = Species::Human.base_stats();
        assert!(horse.run_speed > human.run_speed);
        assert!(horse.max_stamina > human.max_stamina);
        assert!(Species::Horse.stamina_drain_factor() < 1.0);
    }

    #[test]
    fn test_presets_pass_bounds_check() {
        for species in [
            Species::Human,
            Species::Zombie,
            Species::Chicken,
            Species::Horse,
        ] {
            let mut stats = species.base_stats();
            let before = stats.clone();
            stats.clamp_to_bounds();
            assert_eq!(stats.health, before.health, "{:?}", species);
            assert_eq!(stats.armor, before.armor, "{:?}", species);
        }
    }
}
