//! Faction base marker.
//!
//! A base is an entity with [`Base`] and a
//! [`MapPosition`](super::mapposition::MapPosition). Its hit points live in
//! the [`EconomyLedger`](crate::resources::economy::EconomyLedger) so that
//! every change goes through the same notification path as money.

use bevy_ecs::prelude::Component;

use crate::components::faction::Faction;

#[derive(Component, Clone, Debug)]
pub struct Base {
    pub faction: Faction,
    pub name: String,
}

impl Base {
    pub fn new(faction: Faction, name: impl Into<String>) -> Self {
        Self {
            faction,
            name: name.into(),
        }
    }
}
