//! Commands sent to the scene/UI collaborator.
//!
//! These are the only outputs of the simulation besides the ECS world
//! itself. Positions are not streamed; the renderer reads
//! [`MapPosition`](crate::components::mapposition::MapPosition) directly.

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;
use glam::Vec3;

use crate::components::faction::Faction;
use crate::resources::economy::StatsSnapshot;

#[derive(Message, Debug, Clone, PartialEq)]
pub enum SceneCmd {
    /// A unit was spawned and needs a visual.
    Attach {
        entity: Entity,
        kind: String,
        faction: Faction,
        position: Vec3,
    },
    /// A unit died or was cleared; drop its visual.
    Detach { entity: Entity },
    /// Health bar fill for a unit that just took damage, in `[0, 1]`.
    HealthBar { entity: Entity, scale: f32 },
    /// Economy changed.
    Stats(StatsSnapshot),
}
