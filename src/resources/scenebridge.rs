//! Bridge between the simulation and the scene/UI collaborator.
//!
//! The renderer is not part of this crate. It connects through a
//! [`SceneBridge`]: systems write [`SceneCmd`] messages, and
//! [`forward_scene_cmds`](crate::systems::scenebridge::forward_scene_cmds)
//! pushes them down a channel the renderer drains at its own pace.
//!
//! A world without a bridge, or with a bridge whose `can_create_units` flag
//! is off, cannot create units: spawns fail with
//! [`SimError::MissingCapability`](crate::error::SimError::MissingCapability).

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::events::scene::SceneCmd;

#[derive(Resource)]
pub struct SceneBridge {
    /// Sender for [`SceneCmd`] messages (simulation -> renderer).
    pub tx_cmd: Sender<SceneCmd>,
    /// Whether the collaborator can instantiate unit visuals.
    pub can_create_units: bool,
}

impl SceneBridge {
    /// Create a bridge and the receiver the collaborator reads from.
    pub fn connect() -> (Self, Receiver<SceneCmd>) {
        let (tx_cmd, rx_cmd) = unbounded::<SceneCmd>();
        (
            Self {
                tx_cmd,
                can_create_units: true,
            },
            rx_cmd,
        )
    }

    pub fn without_unit_creation(mut self) -> Self {
        self.can_create_units = false;
        self
    }
}

/// Insert a connected bridge and the `Messages<SceneCmd>` queue.
///
/// Returns the receiving end of the channel for the collaborator.
pub fn setup_scene_bridge(world: &mut World) -> Receiver<SceneCmd> {
    let (bridge, rx) = SceneBridge::connect();
    world.insert_resource(bridge);
    world.init_resource::<Messages<SceneCmd>>();
    rx
}
