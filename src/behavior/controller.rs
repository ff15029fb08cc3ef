//! Per-entity behavior stepping
//!
//! One call to `step_entity` advances one entity by one tick, in a fixed
//! internal order: target acquisition, then state advance (movement and
//! combat), then passive regeneration. Regeneration runs last so it cannot
//! undo the stamina or health cost of an action taken earlier in the same
//! tick.
//!
//! The entity being stepped is taken out of the registry for the duration of
//! its step; every registry query it makes therefore excludes itself, and
//! cross-entity writes (damage, knockback) go through the registry to the
//! other party only.

use crate::behavior::policy::{react, BehaviorEvent};
use crate::behavior::state::{
    BehaviorState, EscapeTask, PursueTask, StateKind, Transition, WanderPhase, WanderTask,
};
use crate::core::config::SimConfig;
use crate::core::cooldown::{in_cooldown, NEVER};
use crate::core::error::{Result, SimError};
use crate::core::types::{EntityId, HostilityLevel, Vec3};
use crate::entity::species::Species;
use crate::entity::Entity;
use crate::host::{CollisionQuery, MovementResolver};
use crate::sim::tick::SimulationEvent;
use crate::sim::world::World;
use crate::spatial::query::nearest_visible;
use rand::Rng;

/// Advance one entity by one tick.
///
/// A missing id is not an error: the entity was despawned earlier this tick
/// and the stale reference is simply skipped.
pub fn step_entity<H>(
    world: &mut World,
    host: &mut H,
    config: &SimConfig,
    id: EntityId,
    dt: f32,
    events: &mut Vec<SimulationEvent>,
) -> Result<()>
where
    H: CollisionQuery + MovementResolver,
{
    let Some(mut entity) = world.take(id) else {
        return Ok(());
    };

    entity.stats.is_moving = false;

    acquire_target(&mut entity, world, host, events);
    advance_state(&mut entity, world, host, config, dt, events);

    // Passive regeneration, stamina before health
    entity.stats.regen_stamina(dt, world.now);
    entity.stats.natural_heal(dt, world.now);

    if entity.species == Species::Chicken {
        lay_eggs(&mut entity, world, events);
    }

    world.put_back(entity);
    Ok(())
}

/// External command: start pursuing `target`.
///
/// A pursue request for an entity that is already tracking a different
/// target, or for a target that does not exist, is a warning and a no-op.
pub fn command_pursue(
    world: &mut World,
    entity_id: EntityId,
    target_id: EntityId,
    events: &mut Vec<SimulationEvent>,
) -> Result<()> {
    if !world.contains(target_id) {
        tracing::warn!(?entity_id, ?target_id, "pursue command for unknown target; ignored");
        return Ok(());
    }
    let tick = world.current_tick;
    let entity = world
        .get_mut(entity_id)
        .ok_or(SimError::EntityNotFound(entity_id))?;

    if let BehaviorState::Pursue(task) = &entity.state {
        if task.target != target_id {
            tracing::warn!(
                ?entity_id,
                ?target_id,
                tracked = ?task.target,
                "pursue command does not match tracked target; ignored"
            );
            return Ok(());
        }
    }
    apply_transition(entity, Transition::ToPursue(target_id), tick, events);
    Ok(())
}

/// Swap in the new state, clearing or retargeting the weak references.
pub fn apply_transition(
    entity: &mut Entity,
    transition: Transition,
    tick: u64,
    events: &mut Vec<SimulationEvent>,
) {
    let new_state = match transition {
        Transition::ToWander => {
            entity.target = None;
            BehaviorState::Wander(WanderTask::default())
        }
        Transition::ToPursue(target) => {
            entity.target = Some(target);
            BehaviorState::Pursue(PursueTask { target })
        }
        Transition::ToEscape => {
            entity.target = None;
            BehaviorState::Escape(EscapeTask)
        }
    };

    let from = entity.state.kind();
    let to = new_state.kind();
    // Replacing the whole value drops the old task data with it
    entity.state = new_state;
    if from != to {
        events.push(SimulationEvent::StateChanged {
            entity: entity.id,
            from,
            to,
            tick,
        });
    }
}

/// Stage (a): hostile entities scan for a target when not already chasing.
fn acquire_target<H>(
    entity: &mut Entity,
    world: &World,
    host: &H,
    events: &mut Vec<SimulationEvent>,
) where
    H: CollisionQuery,
{
    if entity.hostility != HostilityLevel::Hostile {
        return;
    }
    if entity.state.kind() == StateKind::Pursue {
        return;
    }

    let prey = &world.config.hostile_targets;
    let found = nearest_visible(
        world,
        host,
        entity.position,
        entity.stats.visibility_range,
        None,
        |candidate| prey.contains(&candidate.species),
    );

    if let Some(target) = found {
        if let Some(transition) = react(
            entity.hostility,
            entity.stats.is_low_health,
            BehaviorEvent::TargetSighted { target },
        ) {
            apply_transition(entity, transition, world.current_tick, events);
        }
    }
}

/// Stage (b): advance the current state by one step.
fn advance_state<H>(
    entity: &mut Entity,
    world: &mut World,
    host: &mut H,
    config: &SimConfig,
    dt: f32,
    events: &mut Vec<SimulationEvent>,
) where
    H: CollisionQuery + MovementResolver,
{
    match entity.state.kind() {
        StateKind::Idle => {
            apply_transition(entity, Transition::ToWander, world.current_tick, events);
        }
        StateKind::Wander => wander_step(entity, world, host, config, dt),
        StateKind::Pursue => pursue_step(entity, world, host, config, dt, events),
        StateKind::Escape => escape_step(entity, world, host, config, dt, events),
    }
}

/// Wander: pause, pick an unobstructed heading, walk it, repeat.
fn wander_step<H>(entity: &mut Entity, world: &mut World, host: &mut H, config: &SimConfig, dt: f32)
where
    H: CollisionQuery + MovementResolver,
{
    let now = world.now;
    let BehaviorState::Wander(task) = &mut entity.state else {
        return;
    };

    match task.phase {
        WanderPhase::Paused { until } => {
            if now < until {
                return;
            }
            // Pick a heading whose full walk distance is clear. All
            // attempts blocked: stay paused and retry next tick.
            for _ in 0..config.wander_heading_attempts {
                let angle = world.rng.gen_range(0.0..std::f32::consts::TAU);
                let duration = world
                    .rng
                    .gen_range(config.wander_walk_min..config.wander_walk_max);
                let heading = Vec3::from_heading(angle);
                let destination = entity.position + heading * (entity.stats.speed * duration);

                if !host.raycast_obstructed(entity.position, destination) {
                    task.phase = WanderPhase::Walking {
                        heading,
                        until: now + duration,
                    };
                    break;
                }
            }
        }
        WanderPhase::Walking { heading, until } => {
            if now >= until {
                let pause = world
                    .rng
                    .gen_range(config.wander_pause_min..config.wander_pause_max);
                task.phase = WanderPhase::Paused { until: now + pause };
                return;
            }
            let speed = entity.stats.speed;
            move_toward(entity, host, heading, speed, dt, config.turn_rate);
        }
    }
}

/// Pursue: close on the target at run speed and attack in range.
fn pursue_step<H>(
    entity: &mut Entity,
    world: &mut World,
    host: &mut H,
    config: &SimConfig,
    dt: f32,
    events: &mut Vec<SimulationEvent>,
) where
    H: CollisionQuery + MovementResolver,
{
    let BehaviorState::Pursue(task) = &entity.state else {
        return;
    };
    let target_id = task.target;
    let tick = world.current_tick;

    // Stale or dead target: lost, not an error
    let Some(target_pos) = world
        .get(target_id)
        .filter(|t| t.is_alive())
        .map(|t| t.position)
    else {
        apply_transition(entity, Transition::ToWander, tick, events);
        return;
    };

    if host.raycast_obstructed(entity.position, target_pos) {
        apply_transition(entity, Transition::ToWander, tick, events);
        return;
    }

    let distance = entity.position.distance(&target_pos);
    let giveup_radius = entity.stats.visibility_range * config.pursuit_giveup_factor;
    if distance > giveup_radius {
        apply_transition(entity, Transition::ToWander, tick, events);
        return;
    }

    // Neutral pursuers abandon the fight once critically hurt
    if entity.hostility == HostilityLevel::Neutral && entity.stats.is_low_health {
        apply_transition(entity, Transition::ToEscape, tick, events);
        return;
    }

    let heading = (target_pos - entity.position).normalize();
    run_toward(entity, world, host, config, heading, dt);

    if distance <= entity.stats.attack_range
        && !in_cooldown(entity.stats.attack_timestamp, entity.stats.attack_cooldown, world.now)
    {
        resolve_attack(entity, world, host, config, target_id, events);
    }
}

/// Escape: flee the aggregate of live, in-range attackers.
fn escape_step<H>(
    entity: &mut Entity,
    world: &mut World,
    host: &mut H,
    config: &SimConfig,
    dt: f32,
    events: &mut Vec<SimulationEvent>,
) where
    H: CollisionQuery + MovementResolver,
{
    let position = entity.position;
    let giveup_radius = entity.stats.visibility_range * config.escape_giveup_factor;

    // Dead attackers leave the list; distant ones stay but stop mattering
    entity
        .attacked_by
        .retain(|&a| world.get(a).map_or(false, |e| e.is_alive()));

    let threats: Vec<Vec3> = entity
        .attacked_by
        .iter()
        .filter_map(|&a| world.get(a))
        .map(|e| e.position)
        .filter(|p| p.distance(&position) <= giveup_radius)
        .collect();

    if threats.is_empty() {
        apply_transition(entity, Transition::ToWander, world.current_tick, events);
        return;
    }

    let mut heading = Vec3::ZERO;
    for threat in &threats {
        heading += (position - *threat).normalize();
    }

    // Obstacles push the heading away from their closest surface point,
    // harder the closer they are
    for obstacle in host.overlap_obstacles(position, config.escape_obstacle_radius) {
        let surface = host.closest_point(obstacle, position);
        let away = position - surface;
        let gap = away.length();
        if gap > 0.0001 {
            let weight = (1.0 - gap / config.escape_obstacle_radius).max(0.0);
            heading += away.normalize() * weight;
        }
    }

    let heading = heading.normalize();
    if heading == Vec3::ZERO {
        // Perfectly surrounded; keep the current facing
        return;
    }
    run_toward(entity, world, host, config, heading, dt);
}

/// One attack attempt against `target_id`, with range recheck at current
/// positions. Damage, attacker registration, the victim's policy reaction
/// and knockback, and kill bookkeeping all resolve here.
fn resolve_attack<H>(
    attacker: &mut Entity,
    world: &mut World,
    host: &mut H,
    config: &SimConfig,
    target_id: EntityId,
    events: &mut Vec<SimulationEvent>,
) where
    H: CollisionQuery + MovementResolver,
{
    let now = world.now;
    let tick = world.current_tick;
    let attacker_id = attacker.id;
    let attacker_pos = attacker.position;
    let attack_damage = attacker.stats.attack_damage;
    let attack_range = attacker.stats.attack_range;

    let Some((damage, died, victim_pos, knockback_force)) = world.get_mut(target_id).and_then(|victim| {
        if attacker_pos.distance(&victim.position) > attack_range {
            return None;
        }
        let damage = victim.stats.apply_damage(attack_damage, now);
        victim.record_attacker(attacker_id);
        Some((
            damage,
            victim.stats.is_dead(),
            victim.position,
            victim.stats.knockback_force,
        ))
    }) else {
        return;
    };

    attacker.stats.attack_timestamp = now;
    events.push(SimulationEvent::AttackLanded {
        attacker: attacker_id,
        target: target_id,
        damage,
        tick,
    });

    if died {
        events.push(SimulationEvent::EntityDied {
            entity: target_id,
            killer: Some(attacker_id),
            tick,
        });
        world.despawn(target_id);

        // Kill credit; the chase is over for this attacker. Other pursuers
        // of the victim find out on their own next tick.
        attacker.kills += 1;
        attacker.experience += config.kill_experience;
        attacker.forget_attacker(target_id);
        apply_transition(attacker, Transition::ToWander, tick, events);
        return;
    }

    // Victim reacts per the hostility table
    if let Some(victim) = world.get_mut(target_id) {
        if let Some(transition) = react(
            victim.hostility,
            victim.stats.is_low_health,
            BehaviorEvent::Attacked {
                attacker: attacker_id,
            },
        ) {
            apply_transition(victim, transition, tick, events);
        }
        victim.stats.reaction_timestamp = now;
    }

    // The victim's knockback shoves the striker back
    let push = (attacker_pos - victim_pos).normalize() * (knockback_force * config.knockback_scale);
    attacker.position = host.resolve_move(attacker_id, attacker.position, push);
}

/// Walk-speed movement with smoothed turning.
fn move_toward<H>(
    entity: &mut Entity,
    host: &mut H,
    heading: Vec3,
    speed: f32,
    dt: f32,
    turn_rate: f32,
) where
    H: MovementResolver,
{
    entity.stats.is_moving = true;
    entity.facing = turn_toward(entity.facing, heading, turn_rate * dt);
    let displacement = entity.facing * (speed * dt);
    entity.position = host.resolve_move(entity.id, entity.position, displacement);
}

/// Run-speed movement; drains stamina, falls back to walking when spent.
fn run_toward<H>(
    entity: &mut Entity,
    world: &World,
    host: &mut H,
    config: &SimConfig,
    heading: Vec3,
    dt: f32,
) where
    H: MovementResolver,
{
    let speed = entity.stats.effective_run_speed();
    move_toward(entity, host, heading, speed, dt, config.turn_rate);

    if !entity.stats.is_out_of_stamina {
        let drain = config.run_stamina_drain * entity.species.stamina_drain_factor();
        entity.stats.consume_stamina(drain, dt, world.now);
    }
}

/// Interpolated turn: move the facing a fraction of the way toward the
/// desired heading instead of snapping.
fn turn_toward(current: Vec3, desired: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let desired = desired.normalize();
    let blended = (current + (desired - current) * t).normalize();
    if blended == Vec3::ZERO {
        // Opposite vectors cancel; commit to the new heading
        desired
    } else {
        blended
    }
}

fn lay_eggs(entity: &mut Entity, world: &World, events: &mut Vec<SimulationEvent>) {
    if entity.egg_timestamp == NEVER {
        entity.egg_timestamp = world.now;
        return;
    }
    if !in_cooldown(entity.egg_timestamp, world.config.egg_interval, world.now) {
        entity.egg_timestamp = world.now;
        events.push(SimulationEvent::EggsLaid {
            entity: entity.id,
            tick: world.current_tick,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_toward_converges() {
        let mut facing = Vec3::new(1.0, 0.0, 0.0);
        let desired = Vec3::new(0.0, 0.0, 1.0);
        for _ in 0..100 {
            facing = turn_toward(facing, desired, 0.25);
        }
        assert!(facing.dot(&desired) > 0.999);
    }

    #[test]
    fn test_turn_toward_partial_step() {
        let facing = Vec3::new(1.0, 0.0, 0.0);
        let desired = Vec3::new(0.0, 0.0, 1.0);
        let turned = turn_toward(facing, desired, 0.5);
        // Partway between, not snapped
        assert!(turned.dot(&facing) > 0.1);
        assert!(turned.dot(&desired) > 0.1);
    }

    #[test]
    fn test_turn_toward_opposite_commits() {
        let facing = Vec3::new(1.0, 0.0, 0.0);
        let desired = Vec3::new(-1.0, 0.0, 0.0);
        let turned = turn_toward(facing, desired, 0.5);
        assert_eq!(turned, desired);
    }
}
