//! Per-unit combat state.
//!
//! A [`Unit`] holds a copy of the archetype stats it was spawned from plus
//! the mutable state the movement and engagement systems work on. The
//! archetype itself is never touched after spawn.
//!
//! Two timers live here and they gate different things:
//! - `last_attack_time` gates base attacks against `attack_cooldown`
//!   (see [`crate::systems::movement`]).
//! - `engaged_with` stores the engagement start per opponent, which gates
//!   unit-vs-unit damage against the combat delay
//!   (see [`crate::systems::engagement`]). Exchanges also stamp
//!   `last_attack_time`, but the engagement path never reads it.

use bevy_ecs::prelude::{Component, Entity};
use rustc_hash::FxHashMap;

use crate::resources::catalog::{DEFAULT_RANGE, UnitArchetype};

#[derive(Component, Clone, Debug)]
pub struct Unit {
    /// Archetype key the unit was spawned from.
    pub kind: String,
    pub hp: i32,
    pub max_hp: i32,
    pub damage: i32,
    /// Jittered copy of the archetype speed.
    pub speed: f32,
    pub attack_cooldown: f32,
    pub range: f32,
    /// Money the player earns when this unit dies as an enemy.
    pub reward: u32,
    /// True while paired with a live opponent inside the fighting envelope.
    pub in_combat: bool,
    /// Opponent -> engagement start, in `WorldTime::elapsed` seconds.
    pub engaged_with: FxHashMap<Entity, f32>,
    /// Last time this unit dealt damage. `None` until its first attack.
    pub last_attack_time: Option<f32>,
}

impl Unit {
    /// Build a unit from an archetype, adding `speed_jitter` to its speed.
    pub fn from_archetype(kind: impl Into<String>, archetype: &UnitArchetype, speed_jitter: f32) -> Self {
        Self {
            kind: kind.into(),
            hp: archetype.hp,
            max_hp: archetype.hp,
            damage: archetype.damage,
            speed: archetype.speed + speed_jitter,
            attack_cooldown: archetype.attack_cooldown,
            range: archetype.range.unwrap_or(DEFAULT_RANGE),
            reward: archetype.reward,
            in_combat: false,
            engaged_with: FxHashMap::default(),
            last_attack_time: None,
        }
    }

    /// Fraction of health left, for the health bar. Never negative.
    pub fn hp_bar_scale(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.max_hp as f32).max(0.0)
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Subtract `amount` hit points, keeping hp within `[0, max_hp]`.
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = self.hp.saturating_sub(amount).min(self.max_hp).max(0);
    }

    /// Drop out of combat and forget every engagement.
    pub fn disengage(&mut self) {
        self.in_combat = false;
        self.engaged_with.clear();
    }

    /// Whether the base-attack cooldown has run out at `now`.
    pub fn base_attack_ready(&self, now: f32) -> bool {
        match self.last_attack_time {
            None => true,
            Some(last) => now - last > self.attack_cooldown,
        }
    }
}
