//! Lanesiege headless runner.
//!
//! Runs a battle without a renderer: the scene channel is drained and tallied
//! each frame, and a summary is printed when the battle ends or the simulated
//! time runs out.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --seconds 300 --buy basic --buy heavy --buy-every 20
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{debug, error, info};
use serde::Serialize;

use lanesiege::components::faction::Faction;
use lanesiege::events::scene::SceneCmd;
use lanesiege::game::{battle_schedule, init_battle};
use lanesiege::resources::battlestate::BattleState;
use lanesiege::resources::catalog::UnitCatalog;
use lanesiege::resources::economy::{EconomyLedger, StatsSnapshot};
use lanesiege::resources::rosters::Rosters;
use lanesiege::resources::scenebridge::setup_scene_bridge;
use lanesiege::resources::simconfig::SimConfig;
use lanesiege::resources::simrng::SimRng;
use lanesiege::resources::worldtime::WorldTime;
use lanesiege::systems::spawn::purchase_unit;
use lanesiege::systems::time::update_world_time;

/// Lanesiege headless battle runner
#[derive(Parser)]
#[command(version, about = "Runs a lane battle simulation without a renderer.")]
struct Cli {
    /// INI file with simulation tunables. Defaults are used when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON file replacing the built-in unit catalog.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Simulated seconds to run.
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// Frame delta in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Seed for spawn jitter and spawn intervals.
    #[arg(long)]
    seed: Option<u64>,

    /// Unit type the player buys at start. Repeat for more.
    #[arg(long, value_name = "KIND")]
    buy: Vec<String>,

    /// Seconds between re-buying the `--buy` list. 0 buys once.
    #[arg(long, default_value_t = 0.0)]
    buy_every: f32,

    /// Print the final summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    elapsed: f32,
    frames: u64,
    outcome: Option<String>,
    stats: Option<StatsSnapshot>,
    player_units_alive: usize,
    enemy_units_alive: usize,
    units_spawned: u32,
    units_removed: u32,
    hits: u32,
}

fn load_catalog(path: &PathBuf) -> Result<UnitCatalog, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read catalog {}: {}", path.display(), e))?;
    UnitCatalog::from_json_str(&text).map_err(|e| e.to_string())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.dt <= 0.0 {
        eprintln!("Error: --dt must be positive");
        std::process::exit(1);
    }

    let config = match &cli.config {
        Some(path) => {
            let mut config = SimConfig::with_path(path);
            if let Err(e) = config.load_from_file() {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            config
        }
        None => {
            let mut config = SimConfig::new();
            config.load_from_file().ok(); // ignore errors, use defaults
            config
        }
    };

    let catalog = match &cli.catalog {
        Some(path) => match load_catalog(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => UnitCatalog::builtin(),
    };

    let rng = cli.seed.map(SimRng::with_seed).unwrap_or_default();

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    let scene_rx = setup_scene_bridge(&mut world);
    init_battle(&mut world, config, catalog, rng);
    let mut update = battle_schedule();

    let mut summary = RunSummary::default();
    let mut next_buy = 0.0_f32;

    // --------------- Main loop ---------------
    while world.resource::<WorldTime>().elapsed < cli.seconds {
        update_world_time(&mut world, cli.dt);
        let now = world.resource::<WorldTime>().elapsed;

        if !cli.buy.is_empty() && now >= next_buy {
            for kind in &cli.buy {
                if let Err(e) = purchase_unit(&mut world, kind) {
                    debug!("Purchase of {} failed: {}", kind, e);
                }
            }
            next_buy = if cli.buy_every > 0.0 {
                now + cli.buy_every
            } else {
                f32::INFINITY
            };
        }

        update.run(&mut world);
        world.clear_trackers();

        for cmd in scene_rx.try_iter() {
            match cmd {
                SceneCmd::Attach { .. } => summary.units_spawned += 1,
                SceneCmd::Detach { .. } => summary.units_removed += 1,
                SceneCmd::HealthBar { .. } => summary.hits += 1,
                SceneCmd::Stats(stats) => summary.stats = Some(stats),
            }
        }

        if let Some(outcome) = world.resource::<BattleState>().outcome() {
            info!("Battle over at {:.2}s: {:?}", now, outcome);
            summary.outcome = Some(format!("{:?}", outcome));
            break;
        }
    }

    let time = *world.resource::<WorldTime>();
    summary.elapsed = time.elapsed;
    summary.frames = time.frame_count;
    let rosters = world.resource::<Rosters>();
    summary.player_units_alive = rosters.len(Faction::Player);
    summary.enemy_units_alive = rosters.len(Faction::Enemy);
    let stats = world.resource::<EconomyLedger>().snapshot();
    summary.stats = Some(stats);

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => error!("Failed to serialize summary: {}", e),
        }
    } else {
        info!(
            "After {:.2}s ({} frames): money={}, player base={}, enemy base={}, units alive {}/{}, spawned={}, removed={}",
            summary.elapsed,
            summary.frames,
            stats.money,
            stats.player_hp,
            stats.enemy_hp,
            summary.player_units_alive,
            summary.enemy_units_alive,
            summary.units_spawned,
            summary.units_removed
        );
    }
}
