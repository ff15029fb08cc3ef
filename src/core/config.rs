//! Simulation configuration with documented constants
//!
//! All tuning values are collected here with explanations of their purpose
//! and how they interact with each other. The config is owned by the `World`
//! and passed down; there is no process-global instance.

use crate::core::error::{Result, SimError};
use crate::core::types::HostilityLevel;
use crate::entity::species::Species;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the behavior simulation
///
/// Defaults reproduce the prototype tuning. `validate()` checks the internal
/// consistency the behavior code relies on (hysteresis ordering, give-up
/// factors) before a world is built from the config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === WANDER ===
    /// Minimum pause between wander legs (seconds)
    pub wander_pause_min: f32,
    /// Maximum pause between wander legs (seconds)
    pub wander_pause_max: f32,
    /// Minimum duration of one wander leg (seconds)
    pub wander_walk_min: f32,
    /// Maximum duration of one wander leg (seconds)
    pub wander_walk_max: f32,
    /// Heading attempts per tick when the chosen direction is obstructed
    ///
    /// Each attempt raycasts the full walk distance. If every attempt is
    /// blocked the entity stays paused and retries next tick.
    pub wander_heading_attempts: u32,

    // === PURSUIT / ESCAPE ===
    /// Give-up distance for pursuit, as a multiple of visibility range
    ///
    /// Must be >= 1.0 so a target acquired at the visibility boundary is not
    /// immediately dropped again.
    pub pursuit_giveup_factor: f32,
    /// Give-up distance for escape, as a multiple of visibility range
    ///
    /// Attackers further away than this no longer contribute to the escape
    /// heading; when all of them are, the entity returns to wandering.
    pub escape_giveup_factor: f32,
    /// Radius in which obstacles push on the escape heading (world units)
    pub escape_obstacle_radius: f32,

    // === MOVEMENT ===
    /// Facing interpolation rate (fraction of remaining turn per second)
    ///
    /// Movement turns the facing toward the desired heading before
    /// displacing, so direction changes are smoothed rather than snapped.
    pub turn_rate: f32,
    /// Stamina drained per second while running
    pub run_stamina_drain: f32,
    /// Scale applied to knockback force when converting to displacement
    pub knockback_scale: f32,

    // === COMBAT ===
    /// Experience granted for a kill
    pub kill_experience: f32,
    /// Species that hostile entities acquire on sight
    pub hostile_targets: Vec<Species>,

    // === SUPPLEMENTAL ===
    /// Seconds between egg-laying events for chickens
    pub egg_interval: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            wander_pause_min: 0.5,
            wander_pause_max: 3.0,
            wander_walk_min: 2.0,
            wander_walk_max: 5.0,
            wander_heading_attempts: 8,

            pursuit_giveup_factor: 1.5,
            escape_giveup_factor: 2.0,
            escape_obstacle_radius: 4.0,

            turn_rate: 5.0,
            run_stamina_drain: 2.0,
            knockback_scale: 0.1,

            kill_experience: 3.0,
            hostile_targets: vec![Species::Human, Species::Horse, Species::Chicken],

            egg_interval: 300.0,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys fall back to defaults
    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SimConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.wander_pause_min >= self.wander_pause_max {
            return Err(SimError::InvalidConfig(format!(
                "wander_pause_min ({}) must be < wander_pause_max ({})",
                self.wander_pause_min, self.wander_pause_max
            )));
        }
        if self.wander_walk_min >= self.wander_walk_max {
            return Err(SimError::InvalidConfig(format!(
                "wander_walk_min ({}) must be < wander_walk_max ({})",
                self.wander_walk_min, self.wander_walk_max
            )));
        }

        // Give-up radii must not be tighter than acquisition radii,
        // otherwise targets flap at the boundary.
        if self.pursuit_giveup_factor < 1.0 {
            return Err(SimError::InvalidConfig(format!(
                "pursuit_giveup_factor ({}) must be >= 1.0",
                self.pursuit_giveup_factor
            )));
        }
        if self.escape_giveup_factor < 1.0 {
            return Err(SimError::InvalidConfig(format!(
                "escape_giveup_factor ({}) must be >= 1.0",
                self.escape_giveup_factor
            )));
        }

        if self.turn_rate <= 0.0 {
            return Err(SimError::InvalidConfig("turn_rate must be positive".into()));
        }
        if self.wander_heading_attempts == 0 {
            return Err(SimError::InvalidConfig(
                "wander_heading_attempts must be at least 1".into(),
            ));
        }

        if self
            .hostile_targets
            .iter()
            .any(|s| s.default_hostility() == HostilityLevel::Hostile)
        {
            return Err(SimError::InvalidConfig(
                "hostile_targets must not contain hostile species".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_pause_range_rejected() {
        let mut config = SimConfig::default();
        config.wander_pause_min = 4.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tight_giveup_factor_rejected() {
        let mut config = SimConfig::default();
        config.pursuit_giveup_factor = 0.8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hostile_target_species_rejected() {
        let mut config = SimConfig::default();
        config.hostile_targets.push(Species::Zombie);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SimConfig = toml::from_str("turn_rate = 8.0").unwrap();
        assert_eq!(config.turn_rate, 8.0);
        assert_eq!(config.pursuit_giveup_factor, 1.5);
    }
}
