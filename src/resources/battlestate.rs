//! Battle outcome resource.
//!
//! Set by [`observe_base_destroyed`](crate::events::battle::observe_base_destroyed)
//! the first time a base reaches zero hit points. The simulation keeps
//! ticking afterwards; hosts decide whether to stop.

use bevy_ecs::prelude::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    /// The player's base fell.
    Defeat,
    /// The enemy base fell.
    Victory,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct BattleState {
    outcome: Option<BattleOutcome>,
}

impl BattleState {
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Record an outcome. The first one sticks.
    pub fn finish(&mut self, outcome: BattleOutcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    pub fn reset(&mut self) {
        self.outcome = None;
    }
}
