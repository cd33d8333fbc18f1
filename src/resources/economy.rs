//! Player money and base hit points.
//!
//! Every mutation of the [`EconomyLedger`] queues a [`StatsSnapshot`]. The
//! [`forward_scene_cmds`](crate::systems::scenebridge::forward_scene_cmds)
//! system drains that queue once per tick and hands each snapshot to the UI
//! collaborator, so the UI sees one update per mutation, in order.

use bevy_ecs::prelude::Resource;
use log::{debug, info};
use serde::Serialize;

use crate::components::faction::Faction;
use crate::error::SimError;
use crate::resources::simconfig::SimConfig;

/// What the UI shows: money and both bases' hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub money: u32,
    pub player_hp: i32,
    pub enemy_hp: i32,
}

#[derive(Resource, Debug, Clone)]
pub struct EconomyLedger {
    money: u32,
    player_base_hp: i32,
    enemy_base_hp: i32,
    pending: Vec<StatsSnapshot>,
}

impl Default for EconomyLedger {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl EconomyLedger {
    pub fn new(money: u32, player_base_hp: i32, enemy_base_hp: i32) -> Self {
        let mut ledger = Self {
            money,
            player_base_hp: player_base_hp.max(0),
            enemy_base_hp: enemy_base_hp.max(0),
            pending: Vec::new(),
        };
        ledger.notify();
        ledger
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.starting_money,
            config.player_base_hp,
            config.enemy_base_hp,
        )
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn base_hp(&self, faction: Faction) -> i32 {
        match faction {
            Faction::Player => self.player_base_hp,
            Faction::Enemy => self.enemy_base_hp,
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            money: self.money,
            player_hp: self.player_base_hp,
            enemy_hp: self.enemy_base_hp,
        }
    }

    /// True once the player's base has no hit points left.
    pub fn is_defeat(&self) -> bool {
        self.player_base_hp == 0
    }

    /// Deduct `amount` if affordable. On failure nothing changes and no
    /// notification is queued.
    pub fn spend(&mut self, amount: u32) -> Result<(), SimError> {
        if self.money < amount {
            return Err(SimError::InsufficientFunds {
                needed: amount,
                available: self.money,
            });
        }
        self.money -= amount;
        self.notify();
        Ok(())
    }

    pub fn award(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
        self.notify();
    }

    /// Subtract hit points from a base, clamping at zero.
    ///
    /// Returns `true` when this call is the one that brought the base to
    /// zero, so callers can announce the outcome exactly once.
    pub fn damage_base(&mut self, faction: Faction, amount: i32) -> bool {
        let hp = match faction {
            Faction::Player => &mut self.player_base_hp,
            Faction::Enemy => &mut self.enemy_base_hp,
        };
        let was_standing = *hp > 0;
        *hp = hp.saturating_sub(amount).max(0);
        let destroyed = was_standing && *hp == 0;
        debug!("{} base took {} damage, hp={}", faction.name(), amount, *hp);
        if destroyed && faction == Faction::Player {
            info!("GAME OVER: player base destroyed");
        }
        self.notify();
        destroyed
    }

    /// Restore starting values from `config`.
    pub fn reset(&mut self, config: &SimConfig) {
        self.money = config.starting_money;
        self.player_base_hp = config.player_base_hp.max(0);
        self.enemy_base_hp = config.enemy_base_hp.max(0);
        self.notify();
    }

    /// Take every snapshot queued since the last drain, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<StatsSnapshot> {
        std::mem::take(&mut self.pending)
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        self.pending.push(snapshot);
    }
}
