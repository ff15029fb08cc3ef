//! Property tests for the stat block invariants
//!
//! Health and stamina must stay inside [0, max] after any sequence of
//! mutations, and the low-health flag must never flap inside the hysteresis
//! band.

use proptest::prelude::*;
use wildstead::entity::stats::StatBlock;

/// One randomly chosen stat mutation
#[derive(Debug, Clone)]
enum StatOp {
    Damage(f32),
    NaturalHeal(f32),
    EatHeal(f32),
    ConsumeStamina(f32),
    RegenStamina(f32),
}

fn stat_op() -> impl Strategy<Value = StatOp> {
    prop_oneof![
        (0.0f32..250.0).prop_map(StatOp::Damage),
        (0.0f32..10.0).prop_map(StatOp::NaturalHeal),
        (0.0f32..200.0).prop_map(StatOp::EatHeal),
        (0.0f32..300.0).prop_map(StatOp::ConsumeStamina),
        (0.0f32..10.0).prop_map(StatOp::RegenStamina),
    ]
}

fn apply(stats: &mut StatBlock, op: &StatOp, now: f32) {
    match op {
        StatOp::Damage(amount) => {
            stats.apply_damage(*amount, now);
        }
        StatOp::NaturalHeal(dt) => {
            stats.natural_heal(*dt, now);
        }
        StatOp::EatHeal(amount) => {
            stats.eat_heal(*amount, now);
        }
        StatOp::ConsumeStamina(amount) => {
            stats.consume_stamina(*amount, 0.1, now);
        }
        StatOp::RegenStamina(dt) => {
            stats.regen_stamina(*dt, now);
        }
    }
}

proptest! {
    /// Bounds hold after any operation sequence.
    #[test]
    fn health_and_stamina_stay_bounded(ops in prop::collection::vec(stat_op(), 1..60)) {
        let mut stats = StatBlock::default();
        let mut now = 0.0f32;

        for op in &ops {
            now += 0.5;
            apply(&mut stats, op, now);

            prop_assert!(stats.health >= 0.0);
            prop_assert!(stats.health <= stats.max_health);
            prop_assert!(stats.stamina >= 0.0);
            prop_assert!(stats.stamina <= stats.max_stamina);
        }
    }

    /// The low-health flag only sets below the enter bound and only clears
    /// above the exit bound; inside the band it keeps its value.
    #[test]
    fn low_health_flag_respects_hysteresis(ops in prop::collection::vec(stat_op(), 1..60)) {
        let mut stats = StatBlock::default();
        let mut now = 0.0f32;

        for op in &ops {
            now += 0.5;
            let was_low = stats.is_low_health;
            apply(&mut stats, op, now);

            if stats.is_low_health && !was_low {
                prop_assert!(stats.health < stats.low_health_enter);
            }
            if !stats.is_low_health && was_low {
                prop_assert!(stats.health > stats.low_health_exit);
            }
        }
    }

    /// The out-of-stamina flag sets only at empty and clears only at the
    /// recovery bound.
    #[test]
    fn stamina_flag_respects_hysteresis(ops in prop::collection::vec(stat_op(), 1..60)) {
        let mut stats = StatBlock::default();
        let mut now = 0.0f32;

        for op in &ops {
            now += 0.5;
            let was_out = stats.is_out_of_stamina;
            apply(&mut stats, op, now);

            if stats.is_out_of_stamina && !was_out {
                prop_assert!(stats.stamina == 0.0);
            }
            if !stats.is_out_of_stamina && was_out {
                prop_assert!(stats.stamina >= stats.stamina_recover_at);
            }
        }
    }
}
