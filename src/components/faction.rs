use bevy_ecs::prelude::Component;

/// Side a unit or base fights for.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    /// The faction this one fights against.
    pub fn opponent(self) -> Self {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Faction::Player => "player",
            Faction::Enemy => "enemy",
        }
    }
}
