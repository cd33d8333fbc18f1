//! Enemy spawn timer.
//!
//! The [`SpawnScheduler`] is a self re-arming one-shot timer: each attempt
//! decides the delay until the next one. The
//! [`enemy_spawn_scheduler`](crate::systems::spawn::enemy_spawn_scheduler)
//! system fires it and picks the delay; this resource only keeps the time.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone)]
pub struct SpawnScheduler {
    /// Elapsed time at which the next attempt is due.
    pub next_attempt_at: f32,
    /// Cleared by [`SpawnScheduler::stop`]; a stopped scheduler never fires.
    pub active: bool,
    /// Number of enemies this scheduler has spawned.
    pub spawned: u32,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self {
            next_attempt_at: 0.0,
            active: true,
            spawned: 0,
        }
    }
}

impl SpawnScheduler {
    pub fn is_due(&self, now: f32) -> bool {
        self.active && now >= self.next_attempt_at
    }

    /// Schedule the next attempt `delay` seconds after `now`.
    pub fn rearm(&mut self, now: f32, delay: f32) {
        self.next_attempt_at = now + delay;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Restart the chain with an immediate attempt at `now`.
    pub fn start(&mut self, now: f32) {
        self.active = true;
        self.next_attempt_at = now;
    }
}
