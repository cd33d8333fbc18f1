//! Shared random source for spawn jitter and scheduler intervals.
//!
//! Seeding it makes a whole run reproducible, since nothing else in the
//! simulation draws random numbers.

use bevy_ecs::prelude::Resource;
use fastrand::Rng;

#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(Rng::new())
    }
}

impl SimRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(Rng::with_seed(seed))
    }

    /// Sample a random f32 in the range [min, max).
    /// If the range is smaller than EPSILON, returns min directly.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        let range = max - min;
        if range < f32::EPSILON {
            return min;
        }
        min + self.0.f32() * range
    }
}
