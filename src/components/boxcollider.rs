use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Axis-aligned fighting envelope centered on the entity position.
///
/// Two units engage when their envelopes touch or overlap. The default
/// envelope is long on the x axis so that units meet head-on along the lane
/// before their bodies would collide.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vec3,
}

impl BoxCollider {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            size: Vec3::new(x, y, z),
        }
    }

    /// Returns (min, max) of the collider AABB for a given entity position.
    /// Handles negative size by using its magnitude.
    pub fn aabb(&self, position: Vec3) -> (Vec3, Vec3) {
        let half = self.size.abs() * 0.5;
        (position - half, position + half)
    }

    /// AABB vs AABB test against another collider. Touching faces count.
    pub fn overlaps(&self, position: Vec3, other: &Self, other_position: Vec3) -> bool {
        let (min_a, max_a) = self.aabb(position);
        let (min_b, max_b) = other.aabb(other_position);
        min_a.cmple(max_b).all() && max_a.cmpge(min_b).all()
    }
}
