//! Unit spawning.
//!
//! - [`spawn_unit`] – create one unit of a catalog archetype for a faction
//! - [`purchase_unit`] – player-triggered spawn paid from the ledger
//! - [`enemy_spawn_scheduler`] – exclusive system running the enemy spawn
//!   timer chain
//!
//! All three take `&mut World`, so a spawn can never interleave with the
//! movement or engagement systems of the same tick.
//!
//! # Scheduler Flow
//!
//! Each frame the scheduler checks whether its timer is due. When it is:
//!
//! 1. If the enemy roster already holds `spawn_cap` units, re-arm after a
//!    short random delay (`retry_min..retry_max`) without spawning.
//! 2. Otherwise spawn one enemy of `enemy_kind` and re-arm after a long
//!    random delay (`next_min..next_max`).
//! 3. If the spawn fails (no scene collaborator, unknown kind), log it and
//!    re-arm with the short delay. The chain never stops on its own.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info, warn};

use crate::components::base::Base;
use crate::components::boxcollider::BoxCollider;
use crate::components::faction::Faction;
use crate::components::mapposition::MapPosition;
use crate::components::unit::Unit;
use crate::error::SimError;
use crate::events::scene::SceneCmd;
use crate::resources::catalog::UnitCatalog;
use crate::resources::economy::EconomyLedger;
use crate::resources::rosters::Rosters;
use crate::resources::scenebridge::SceneBridge;
use crate::resources::simconfig::SimConfig;
use crate::resources::simrng::SimRng;
use crate::resources::spawner::SpawnScheduler;
use crate::resources::worldtime::WorldTime;

/// Fail with [`SimError::MissingCapability`] unless a scene collaborator
/// that can create units is connected.
pub fn ensure_unit_creation(world: &World) -> Result<(), SimError> {
    match world.get_resource::<SceneBridge>() {
        Some(bridge) if bridge.can_create_units => Ok(()),
        _ => Err(SimError::MissingCapability("create_unit_entity")),
    }
}

/// Position of a faction's base.
pub fn base_position(world: &mut World, faction: Faction) -> Result<Vec3, SimError> {
    let mut bases = world.query::<(&Base, &MapPosition)>();
    bases
        .iter(world)
        .find(|(base, _)| base.faction == faction)
        .map(|(_, position)| position.pos)
        .ok_or(SimError::MissingCapability("base_position"))
}

/// Spawn one unit of `kind` in front of `faction`'s base.
///
/// The unit copies its archetype's stats, gets a random speed bonus in
/// `[0, speed_jitter)`, is appended to the tail of its roster, and an
/// [`SceneCmd::Attach`] is queued for the renderer.
pub fn spawn_unit(world: &mut World, kind: &str, faction: Faction) -> Result<Entity, SimError> {
    let archetype = world
        .get_resource_or_init::<UnitCatalog>()
        .lookup(kind)?
        .clone();
    ensure_unit_creation(world)?;
    let base = base_position(world, faction)?;

    let (offset, max_jitter, envelope) = {
        let config = world.get_resource_or_init::<SimConfig>();
        (
            config.spawn_offset(faction),
            config.speed_jitter,
            config.envelope,
        )
    };
    let jitter = world
        .get_resource_or_init::<SimRng>()
        .range_f32(0.0, max_jitter);
    let position = base + offset;

    let entity = world
        .spawn((
            Unit::from_archetype(kind, &archetype, jitter),
            faction,
            MapPosition::from_vec(position),
            BoxCollider { size: envelope },
        ))
        .id();
    world.get_resource_or_init::<Rosters>().push(faction, entity);
    world
        .get_resource_or_init::<Messages<SceneCmd>>()
        .write(SceneCmd::Attach {
            entity,
            kind: kind.to_string(),
            faction,
            position,
        });

    info!(
        "Spawned {} {} {:?} at ({:.2}, {:.2}, {:.2})",
        faction.name(),
        kind,
        entity,
        position.x,
        position.y,
        position.z
    );
    Ok(entity)
}

/// Buy and spawn a player unit.
///
/// The archetype is resolved and the scene capability checked before any
/// money moves. If the spawn still fails after paying, the cost is refunded.
pub fn purchase_unit(world: &mut World, kind: &str) -> Result<Entity, SimError> {
    let cost = world
        .get_resource_or_init::<UnitCatalog>()
        .lookup(kind)?
        .cost;
    ensure_unit_creation(world)?;
    world.get_resource_or_init::<EconomyLedger>().spend(cost)?;

    match spawn_unit(world, kind, Faction::Player) {
        Ok(entity) => Ok(entity),
        Err(err) => {
            warn!("Refunding {} after failed {} purchase: {}", cost, kind, err);
            world.get_resource_or_init::<EconomyLedger>().award(cost);
            Err(err)
        }
    }
}

/// Exclusive system driving the enemy spawn timer chain.
pub fn enemy_spawn_scheduler(world: &mut World) {
    let now = world
        .get_resource::<WorldTime>()
        .map(|t| t.elapsed)
        .unwrap_or(0.0);
    if !world.get_resource_or_init::<SpawnScheduler>().is_due(now) {
        return;
    }

    let (cap, retry, next, kind) = {
        let config = world.get_resource_or_init::<SimConfig>();
        (
            config.spawn_cap,
            (config.retry_min, config.retry_max),
            (config.next_min, config.next_max),
            config.enemy_kind.clone(),
        )
    };

    let live = world.get_resource_or_init::<Rosters>().len(Faction::Enemy);
    let delay = if live >= cap {
        let delay = world
            .get_resource_or_init::<SimRng>()
            .range_f32(retry.0, retry.1);
        debug!(
            "Enemy cap reached ({}/{}), retrying in {:.2}s",
            live, cap, delay
        );
        delay
    } else {
        match spawn_unit(world, &kind, Faction::Enemy) {
            Ok(_) => {
                world.get_resource_or_init::<SpawnScheduler>().spawned += 1;
                world
                    .get_resource_or_init::<SimRng>()
                    .range_f32(next.0, next.1)
            }
            Err(err) => {
                warn!("Enemy spawn skipped: {}", err);
                world
                    .get_resource_or_init::<SimRng>()
                    .range_f32(retry.0, retry.1)
            }
        }
    };

    world
        .get_resource_or_init::<SpawnScheduler>()
        .rearm(now, delay);
}
