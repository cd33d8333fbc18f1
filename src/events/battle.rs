//! Base destruction event and the observer that records the outcome.

use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::faction::Faction;
use crate::resources::battlestate::{BattleOutcome, BattleState};

/// Fired the moment a base's hit points reach zero.
#[derive(Event, Debug, Clone, Copy)]
pub struct BaseDestroyedEvent {
    pub faction: Faction,
}

/// Record the battle outcome when a base falls.
///
/// The player's base falling is a defeat, the enemy base falling a victory.
/// Only the first outcome is kept.
pub fn observe_base_destroyed(
    trigger: On<BaseDestroyedEvent>,
    mut battle: Option<ResMut<BattleState>>,
) {
    let faction = trigger.event().faction;
    let outcome = match faction {
        Faction::Player => BattleOutcome::Defeat,
        Faction::Enemy => BattleOutcome::Victory,
    };
    let Some(battle) = battle.as_deref_mut() else {
        warn!("BattleState missing, {} base destroyed unrecorded", faction.name());
        return;
    };
    if battle.finish(outcome) {
        info!("{} base destroyed: {:?}", faction.name(), outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_world() -> World {
        let mut world = World::new();
        world.init_resource::<BattleState>();
        world.add_observer(observe_base_destroyed);
        world.flush();
        world
    }

    #[test]
    fn enemy_base_falling_is_victory() {
        let mut world = make_world();
        world.trigger(BaseDestroyedEvent {
            faction: Faction::Enemy,
        });
        world.flush();
        assert_eq!(
            world.resource::<BattleState>().outcome(),
            Some(BattleOutcome::Victory)
        );
    }

    #[test]
    fn first_outcome_sticks() {
        let mut world = make_world();
        world.trigger(BaseDestroyedEvent {
            faction: Faction::Player,
        });
        world.trigger(BaseDestroyedEvent {
            faction: Faction::Enemy,
        });
        world.flush();
        assert_eq!(
            world.resource::<BattleState>().outcome(),
            Some(BattleOutcome::Defeat)
        );
    }
}
