//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, applying `time_scale` to the provided delta.
use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::simconfig::SimConfig;
use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The system
/// applies the current `time_scale`, then clamps the result to
/// [`SimConfig::max_delta`] when that is positive. With clamping off a long
/// stall produces one large step and units visibly jump.
///
/// `elapsed` is an `f32`. After roughly 2^19 seconds (about six days) a
/// 1/60 s step falls below half its precision and the clock stops moving,
/// freezing spawn and combat timers with it.
pub fn update_world_time(world: &mut World, dt: f32) {
    let max_delta = world
        .get_resource::<SimConfig>()
        .map(|c| c.max_delta)
        .unwrap_or(0.0);
    let mut wt = world.resource_mut::<WorldTime>();
    let mut scaled_dt = dt.max(0.0) * wt.time_scale;
    if max_delta > 0.0 && scaled_dt > max_delta {
        debug!("Clamping frame delta {} to {}", scaled_dt, max_delta);
        scaled_dt = max_delta;
    }
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}
