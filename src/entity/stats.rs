//! Stat block: the mutable resource ledger every entity carries
//!
//! Health and stamina are clamped to [0, max] after every mutation. The
//! low-health and out-of-stamina flags are hysteresis-banded: they switch on
//! below a lower bound and only switch off again above a strictly higher
//! upper bound, so a value sitting on one boundary can never make them flap.

use crate::core::cooldown::{in_cooldown, NEVER};
use serde::{Deserialize, Serialize};

/// Armor mitigation factor: 100 armor absorbs 66% of incoming damage
const ARMOR_ABSORPTION: f32 = 0.66;

/// Per-entity resources, attributes and rate-limit timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatBlock {
    // === HEALTH ===
    /// Current health, 0..=max_health
    pub health: f32,
    pub max_health: f32,
    /// Flat mitigation, 0..=100
    pub armor: f32,
    /// Health recovered per second once the recovery window has passed
    pub health_regen: f32,
    /// Low-health sets in below this value
    pub low_health_enter: f32,
    /// Low-health clears above this value (strictly greater than enter)
    pub low_health_exit: f32,

    // === MOVEMENT ===
    pub speed: f32,
    pub run_speed: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    /// Stamina recovered per second (halved while moving)
    pub stamina_regen: f32,
    /// Out-of-stamina clears once stamina climbs back to this value
    pub stamina_recover_at: f32,

    // === ATTACK ===
    pub attack_damage: f32,
    pub attack_range: f32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Sight radius for acquisition; pursuit and escape give-up radii scale
    /// from this value
    pub visibility_range: f32,
    /// Impulse applied to the striker when this entity is hit
    pub knockback_force: f32,

    // === STATE FLAGS ===
    pub is_low_health: bool,
    pub is_out_of_stamina: bool,
    pub is_moving: bool,

    // === COOLDOWNS & TIMESTAMPS ===
    /// Seconds the reaction to an attacker stays fresh
    pub reaction_cooldown: f32,
    /// Seconds without stamina changes before regen starts
    pub stamina_cooldown: f32,
    /// Seconds without health changes before natural healing starts
    pub health_cooldown: f32,
    pub attack_timestamp: f32,
    pub stamina_timestamp: f32,
    pub health_timestamp: f32,
    pub reaction_timestamp: f32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            health: 100.0,
            max_health: 100.0,
            armor: 0.0,
            health_regen: 2.0,
            low_health_enter: 25.0,
            low_health_exit: 40.0,

            speed: 3.0,
            run_speed: 6.0,
            stamina: 100.0,
            max_stamina: 100.0,
            stamina_regen: 15.0,
            stamina_recover_at: 50.0,

            attack_damage: 10.0,
            attack_range: 5.0,
            attack_cooldown: 0.6,
            visibility_range: 25.0,
            knockback_force: 7.0,

            is_low_health: false,
            is_out_of_stamina: false,
            is_moving: false,

            reaction_cooldown: 15.0,
            stamina_cooldown: 5.0,
            health_cooldown: 5.0,
            attack_timestamp: NEVER,
            stamina_timestamp: NEVER,
            health_timestamp: NEVER,
            reaction_timestamp: NEVER,
        }
    }
}

impl StatBlock {
    /// Apply incoming damage after armor mitigation.
    ///
    /// Returns the damage actually taken. Health clamps at 0; the caller
    /// decides what death means.
    pub fn apply_damage(&mut self, amount: f32, now: f32) -> f32 {
        let damage_taken = amount * (1.0 - self.armor / 100.0 * ARMOR_ABSORPTION);
        self.health = (self.health - damage_taken).max(0.0);
        self.health_timestamp = now;
        self.update_low_health();
        damage_taken
    }

    /// Passive healing once the recovery window since the last health change
    /// has passed. The window halves while low on health.
    pub fn natural_heal(&mut self, dt: f32, now: f32) -> f32 {
        if self.health >= self.max_health {
            return 0.0;
        }
        let window = if self.is_low_health {
            self.health_cooldown * 0.5
        } else {
            self.health_cooldown
        };
        if in_cooldown(self.health_timestamp, window, now) {
            return 0.0;
        }

        let heal = self.health_regen * dt;
        self.health = (self.health + heal).min(self.max_health);
        self.update_low_health();
        heal
    }

    /// Direct heal from eating; not gated by the recovery window.
    pub fn eat_heal(&mut self, amount: f32, now: f32) -> f32 {
        if self.health >= self.max_health {
            return 0.0;
        }
        self.health = (self.health + amount).min(self.max_health);
        self.health_timestamp = now;
        self.update_low_health();
        amount
    }

    /// Drain stamina at `amount` per second. A drain that empties the pool
    /// sets the out-of-stamina flag; further drains are no-ops until the
    /// flag clears.
    pub fn consume_stamina(&mut self, amount: f32, dt: f32, now: f32) -> f32 {
        if self.is_out_of_stamina {
            return 0.0;
        }
        let loss = amount * dt;
        self.stamina -= loss;
        if self.stamina <= 0.0 {
            self.stamina = 0.0;
            self.is_out_of_stamina = true;
        }
        self.stamina_timestamp = now;
        loss
    }

    /// Passive stamina regen once the cooldown since the last stamina change
    /// has passed. Regen halves while moving; the out-of-stamina flag clears
    /// only at the upper hysteresis bound.
    pub fn regen_stamina(&mut self, dt: f32, now: f32) -> f32 {
        if in_cooldown(self.stamina_timestamp, self.stamina_cooldown, now) {
            return 0.0;
        }
        if self.stamina >= self.max_stamina {
            return 0.0;
        }

        let rate = if self.is_moving {
            self.stamina_regen * 0.5
        } else {
            self.stamina_regen
        };
        let regain = rate * dt;
        self.stamina = (self.stamina + regain).min(self.max_stamina);

        if self.stamina >= self.stamina_recover_at {
            self.is_out_of_stamina = false;
        }
        regain
    }

    /// Effective movement speed for a run request; falls back to walk speed
    /// while out of stamina.
    pub fn effective_run_speed(&self) -> f32 {
        if self.is_out_of_stamina {
            self.speed
        } else {
            self.run_speed
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Clamp out-of-range configuration into declared bounds.
    ///
    /// Called on spawn so a bad preset degrades instead of faulting.
    pub fn clamp_to_bounds(&mut self) {
        self.armor = self.armor.clamp(0.0, 100.0);
        self.max_health = self.max_health.max(0.0);
        self.max_stamina = self.max_stamina.max(0.0);
        self.health = self.health.clamp(0.0, self.max_health);
        self.stamina = self.stamina.clamp(0.0, self.max_stamina);
        if self.low_health_exit <= self.low_health_enter {
            self.low_health_exit = self.low_health_enter + 1.0;
        }
        self.update_low_health();
    }

    fn update_low_health(&mut self) {
        if self.health < self.low_health_enter {
            self.is_low_health = true;
        } else if self.health > self.low_health_exit {
            self.is_low_health = false;
        }
        // Inside the band: flag keeps its previous value.
    }
}
