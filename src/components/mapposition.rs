//! World-space position component.
//!
//! Units and bases share this component. The renderer collaborator reads it
//! after each tick to place the matching visual.

use bevy_ecs::prelude::Component;
use glam::Vec3;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vec3,
}

impl MapPosition {
    pub fn from_vec(pos: Vec3) -> Self {
        Self { pos }
    }

    /// Straight-line distance to another position.
    pub fn distance(&self, other: Vec3) -> f32 {
        self.pos.distance(other)
    }
}
