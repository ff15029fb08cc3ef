//! Wildstead - headless simulation driver
//!
//! Spawns a mixed population on an open field with a few obstacles, runs the
//! behavior simulation for a fixed number of ticks, and reports what
//! happened. All tuning comes from the default config or an optional TOML
//! file; the run is fully deterministic for a given seed.

use clap::Parser;
use rand::Rng;
use std::path::PathBuf;

use wildstead::core::config::SimConfig;
use wildstead::core::error::Result;
use wildstead::core::types::Vec3;
use wildstead::entity::species::Species;
use wildstead::host::flatland::Flatland;
use wildstead::sim::tick::{run_simulation_tick, SimulationEvent};
use wildstead::sim::world::World;

const WORLD_SIZE: f32 = 120.0;

#[derive(Parser, Debug)]
#[command(name = "wildstead", about = "Creature behavior simulation")]
struct Args {
    /// RNG seed for a reproducible run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 3000)]
    ticks: u64,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    #[arg(long, default_value_t = 8)]
    humans: u32,

    #[arg(long, default_value_t = 3)]
    zombies: u32,

    #[arg(long, default_value_t = 5)]
    chickens: u32,

    #[arg(long, default_value_t = 2)]
    horses: u32,

    /// Optional TOML config overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
struct RunSummary {
    ticks: u64,
    seconds: f32,
    survivors: Vec<(String, String)>,
    attacks: usize,
    deaths: usize,
    eggs: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::from_toml_path(path)?,
        None => SimConfig::default(),
    };

    let mut world = World::new(config, args.seed);
    let mut field = Flatland::new()
        .with_obstacle(Vec3::new(20.0, 0.0, 15.0), 4.0)
        .with_obstacle(Vec3::new(-25.0, 0.0, -10.0), 6.0)
        .with_obstacle(Vec3::new(5.0, 0.0, -30.0), 3.0);

    spawn_population(&mut world, &args);
    tracing::info!(
        entities = world.entity_count(),
        seed = args.seed,
        "wildstead starting"
    );

    let mut attacks = 0;
    let mut deaths = 0;
    let mut eggs = 0;

    for _ in 0..args.ticks {
        let events = run_simulation_tick(&mut world, &mut field, args.dt);
        for event in &events {
            log_event(&world, event);
            match event {
                SimulationEvent::AttackLanded { .. } => attacks += 1,
                SimulationEvent::EntityDied { .. } => deaths += 1,
                SimulationEvent::EggsLaid { .. } => eggs += 1,
                SimulationEvent::StateChanged { .. } => {}
            }
        }
    }

    let summary = RunSummary {
        ticks: args.ticks,
        seconds: world.now,
        survivors: world
            .iter()
            .map(|e| (e.name.clone(), e.species.name().to_string()))
            .collect(),
        attacks,
        deaths,
        eggs,
    };

    tracing::info!(
        survivors = summary.survivors.len(),
        attacks,
        deaths,
        eggs,
        "run complete"
    );

    if let Some(path) = &args.summary {
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        tracing::info!(?path, "summary written");
    }

    Ok(())
}

fn spawn_population(world: &mut World, args: &Args) {
    let groups = [
        (Species::Human, args.humans),
        (Species::Zombie, args.zombies),
        (Species::Chicken, args.chickens),
        (Species::Horse, args.horses),
    ];
    for (species, count) in groups {
        for i in 0..count {
            let half = WORLD_SIZE / 2.0;
            let x = world.rng.gen_range(-half..half);
            let z = world.rng.gen_range(-half..half);
            world.spawn(
                format!("{}-{}", species.name(), i),
                species,
                Vec3::new(x, 0.0, z),
            );
        }
    }
}

fn log_event(world: &World, event: &SimulationEvent) {
    let name = |id| {
        world
            .get(id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| "<gone>".to_string())
    };
    match event {
        SimulationEvent::StateChanged {
            entity, from, to, ..
        } => {
            tracing::debug!(entity = %name(*entity), ?from, ?to, "state change");
        }
        SimulationEvent::AttackLanded {
            attacker,
            target,
            damage,
            ..
        } => {
            tracing::info!(
                attacker = %name(*attacker),
                target = %name(*target),
                damage,
                "attack landed"
            );
        }
        SimulationEvent::EntityDied { entity, killer, .. } => {
            let killer_name = killer
                .map(|id| name(id))
                .unwrap_or_else(|| "environment".into());
            tracing::info!(entity = %name(*entity), killer = %killer_name, "entity died");
        }
        SimulationEvent::EggsLaid { entity, .. } => {
            tracing::debug!(entity = %name(*entity), "eggs laid");
        }
    }
}
