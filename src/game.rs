//! Battle setup, per-frame schedule and teardown.
//!
//! A host builds a battle in three steps:
//!
//! ```ignore
//! let mut world = World::new();
//! let scene_rx = setup_scene_bridge(&mut world);
//! init_battle(&mut world, SimConfig::new(), UnitCatalog::builtin(), SimRng::default());
//! let mut schedule = battle_schedule();
//!
//! loop {
//!     update_world_time(&mut world, dt);
//!     schedule.run(&mut world);
//!     // drain scene_rx, read MapPosition for rendering
//! }
//! ```

use bevy_ecs::prelude::*;
use log::info;

use crate::components::base::Base;
use crate::components::faction::Faction;
use crate::components::mapposition::MapPosition;
use crate::components::unit::Unit;
use crate::events::battle::observe_base_destroyed;
use crate::events::scene::SceneCmd;
use crate::resources::battlestate::BattleState;
use crate::resources::catalog::UnitCatalog;
use crate::resources::economy::EconomyLedger;
use crate::resources::rosters::Rosters;
use crate::resources::simconfig::SimConfig;
use crate::resources::simrng::SimRng;
use crate::resources::spawner::SpawnScheduler;
use crate::resources::worldtime::WorldTime;
use crate::systems::engagement::engagement;
use crate::systems::movement::movement;
use crate::systems::scenebridge::{forward_scene_cmds, publish_stats, update_scene_cmd_messages};
use crate::systems::spawn::enemy_spawn_scheduler;

/// Insert every battle resource, place both bases and register observers.
pub fn init_battle(world: &mut World, config: SimConfig, catalog: UnitCatalog, rng: SimRng) {
    world.insert_resource(WorldTime::default());
    world.insert_resource(EconomyLedger::from_config(&config));
    world.insert_resource(Rosters::default());
    world.insert_resource(SpawnScheduler::default());
    world.insert_resource(BattleState::default());
    world.insert_resource(catalog);
    world.insert_resource(rng);
    world.init_resource::<Messages<SceneCmd>>();

    world.spawn((
        Base::new(Faction::Player, "PlayerBase"),
        MapPosition::from_vec(config.player_base_position),
    ));
    world.spawn((
        Base::new(Faction::Enemy, "EnemyBase"),
        MapPosition::from_vec(config.enemy_base_position),
    ));
    world.insert_resource(config);

    world.add_observer(observe_base_destroyed);
    world.flush();
    info!("Battle initialized");
}

/// The per-frame schedule: spawn timer, movement, engagement, then hand the
/// frame's output to the scene collaborator.
pub fn battle_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            enemy_spawn_scheduler,
            movement,
            engagement,
            publish_stats,
            forward_scene_cmds,
            update_scene_cmd_messages,
        )
            .chain(),
    );
    schedule
}

/// Stop the enemy spawn timer chain. Nothing else is touched.
pub fn stop_enemy_spawns(world: &mut World) {
    world.get_resource_or_init::<SpawnScheduler>().stop();
    info!("Enemy spawns stopped");
}

/// Tear the battle down to its starting state.
///
/// Despawns every unit, empties both rosters, restores the ledger to the
/// configured starting values, clears the outcome and restarts the spawn
/// timer with an immediate attempt. Bases and the simulation clock stay.
pub fn reset_battle(world: &mut World) {
    let mut units = world.query_filtered::<Entity, With<Unit>>();
    let doomed: Vec<Entity> = units.iter(world).collect();
    for entity in &doomed {
        world.despawn(*entity);
    }
    {
        let mut messages = world.get_resource_or_init::<Messages<SceneCmd>>();
        for entity in &doomed {
            messages.write(SceneCmd::Detach { entity: *entity });
        }
    }
    world.get_resource_or_init::<Rosters>().clear();

    let config = world.get_resource_or_init::<SimConfig>().clone();
    world
        .get_resource_or_init::<EconomyLedger>()
        .reset(&config);
    world.get_resource_or_init::<BattleState>().reset();

    let now = world
        .get_resource::<WorldTime>()
        .map(|t| t.elapsed)
        .unwrap_or(0.0);
    world.get_resource_or_init::<SpawnScheduler>().start(now);
    info!("Battle reset, {} units cleared", doomed.len());
}
