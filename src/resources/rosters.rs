//! Ordered per-faction lists of live units.
//!
//! Roster order is spawn order and drives column queueing: each unit's
//! movement is gated by the position of the unit right before it. Units are
//! appended at the tail and removed by identity, so removal never reorders
//! the survivors.

use bevy_ecs::prelude::{Entity, Resource};

use crate::components::faction::Faction;

#[derive(Resource, Debug, Clone, Default)]
pub struct Rosters {
    pub player: Vec<Entity>,
    pub enemy: Vec<Entity>,
}

impl Rosters {
    pub fn get(&self, faction: Faction) -> &[Entity] {
        match faction {
            Faction::Player => &self.player,
            Faction::Enemy => &self.enemy,
        }
    }

    fn get_mut(&mut self, faction: Faction) -> &mut Vec<Entity> {
        match faction {
            Faction::Player => &mut self.player,
            Faction::Enemy => &mut self.enemy,
        }
    }

    /// Append a freshly spawned unit at the tail of its roster.
    pub fn push(&mut self, faction: Faction, entity: Entity) {
        self.get_mut(faction).push(entity);
    }

    /// Remove a unit by identity. Returns `false` if it was not listed.
    pub fn remove(&mut self, faction: Faction, entity: Entity) -> bool {
        let roster = self.get_mut(faction);
        match roster.iter().position(|e| *e == entity) {
            Some(idx) => {
                roster.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self, faction: Faction) -> usize {
        self.get(faction).len()
    }

    pub fn clear(&mut self) {
        self.player.clear();
        self.enemy.clear();
    }

    /// Every listed unit with its faction: players first, then enemies,
    /// each in roster order.
    pub fn iter_all(&self) -> impl Iterator<Item = (Faction, Entity)> + '_ {
        self.player
            .iter()
            .map(|e| (Faction::Player, *e))
            .chain(self.enemy.iter().map(|e| (Faction::Enemy, *e)))
    }
}
