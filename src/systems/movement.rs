//! Movement toward the opposing base.
//!
//! Runs once per tick before [`engagement`](crate::systems::engagement).
//! Each roster is walked in order:
//!
//! 1. Units in combat hold position.
//! 2. A unit closer than `spacing` to the unit ahead of it in the roster
//!    waits its turn (column queueing).
//! 3. A unit farther than `stop_distance` from the opposing base steps
//!    toward it by `speed * delta * speed_scale`.
//! 4. Otherwise the unit is at the base and attacks it whenever its
//!    `attack_cooldown` has run out since `last_attack_time`.
//!
//! Exactly `stop_distance` away counts as arrived.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::warn;

use crate::components::base::Base;
use crate::components::faction::Faction;
use crate::components::mapposition::MapPosition;
use crate::components::unit::Unit;
use crate::events::battle::BaseDestroyedEvent;
use crate::resources::economy::EconomyLedger;
use crate::resources::rosters::Rosters;
use crate::resources::simconfig::SimConfig;
use crate::resources::worldtime::WorldTime;

fn find_base(bases: &Query<(&Base, &MapPosition), Without<Unit>>, faction: Faction) -> Option<Vec3> {
    bases
        .iter()
        .find(|(base, _)| base.faction == faction)
        .map(|(_, position)| position.pos)
}

pub fn movement(
    time: Res<WorldTime>,
    config: Res<SimConfig>,
    rosters: Res<Rosters>,
    mut ledger: ResMut<EconomyLedger>,
    bases: Query<(&Base, &MapPosition), Without<Unit>>,
    mut units: Query<(&mut MapPosition, &mut Unit)>,
    mut commands: Commands,
) {
    let now = time.elapsed;
    let step_scale = time.delta * config.speed_scale;

    for faction in [Faction::Player, Faction::Enemy] {
        let target_faction = faction.opponent();
        let Some(target) = find_base(&bases, target_faction) else {
            warn!("No {} base to march on", target_faction.name());
            continue;
        };

        let roster = rosters.get(faction);
        for (i, &entity) in roster.iter().enumerate() {
            // The unit ahead has already moved this tick.
            let ahead = if i > 0 {
                units.get(roster[i - 1]).ok().map(|(position, _)| position.pos)
            } else {
                None
            };

            let Ok((mut position, mut unit)) = units.get_mut(entity) else {
                continue;
            };
            if unit.in_combat {
                continue;
            }
            if let Some(ahead) = ahead
                && position.distance(ahead) < config.spacing
            {
                continue;
            }

            let distance = position.distance(target);
            if distance > config.stop_distance {
                let direction = (target - position.pos).normalize_or_zero();
                position.pos += direction * unit.speed * step_scale;
            } else if unit.base_attack_ready(now) {
                unit.last_attack_time = Some(now);
                if ledger.damage_base(target_faction, unit.damage) {
                    commands.trigger(BaseDestroyedEvent {
                        faction: target_faction,
                    });
                }
            }
        }
    }
}
