//! Engagement detection and combat resolution.
//!
//! Runs once per tick after [`movement`](crate::systems::movement::movement).
//!
//! # Pairing
//!
//! Every live unit (players first, then enemies, each in roster order) looks
//! for the nearest live opponent whose fighting envelope overlaps its own.
//! Ties go to the opponent found first in roster order. A paired unit and its
//! opponent are both marked `in_combat`; a unit with no opponent in reach
//! disengages.
//!
//! # Timing
//!
//! A pair's engagement start is stored on both sides. Once `combat_delay`
//! seconds have passed since that stamp, both units lose the other's
//! `damage` at the same time and the stamp is reset to now, so an engaged
//! pair trades blows once every `combat_delay` seconds regardless of which
//! side scans first.
//!
//! # Deaths
//!
//! Units that drop to zero hp are only marked during the scan. A dead unit is
//! skipped as scanner and as candidate for the rest of the tick, so a pair
//! that kills each other is removed together and never fights a second
//! round. Removal happens in a second pass: enemies pay their reward, the
//! unit leaves its roster by identity and is despawned, and everyone else
//! forgets their engagement with it.

use bevy_ecs::prelude::*;
use log::debug;
use rustc_hash::FxHashSet;

use crate::components::boxcollider::BoxCollider;
use crate::components::faction::Faction;
use crate::components::mapposition::MapPosition;
use crate::components::unit::Unit;
use crate::events::scene::SceneCmd;
use crate::resources::economy::EconomyLedger;
use crate::resources::rosters::Rosters;
use crate::resources::simconfig::SimConfig;
use crate::resources::worldtime::WorldTime;

/// Apply one side of an exchange: take `incoming` damage from `opponent`
/// and restart the pair's engagement timer at `now`.
fn exchange_blow(unit: &mut Unit, opponent: Entity, incoming: i32, now: f32) {
    unit.take_damage(incoming);
    unit.last_attack_time = Some(now);
    unit.engaged_with.insert(opponent, now);
}

pub fn engagement(
    time: Res<WorldTime>,
    config: Res<SimConfig>,
    mut rosters: ResMut<Rosters>,
    mut ledger: ResMut<EconomyLedger>,
    mut units: Query<(&MapPosition, &BoxCollider, &mut Unit)>,
    mut scene: MessageWriter<SceneCmd>,
    mut commands: Commands,
) {
    let now = time.elapsed;
    let scan_order: Vec<(Faction, Entity)> = rosters.iter_all().collect();
    let mut dead: Vec<(Faction, Entity)> = Vec::new();
    let mut dead_set: FxHashSet<Entity> = FxHashSet::default();

    for (faction, entity) in scan_order {
        if dead_set.contains(&entity) {
            continue;
        }
        let Ok((position, collider, _)) = units.get(entity) else {
            continue;
        };
        let (position, collider) = (position.pos, *collider);

        let mut nearest: Option<Entity> = None;
        let mut min_dist = f32::INFINITY;
        for &candidate in rosters.get(faction.opponent()) {
            if dead_set.contains(&candidate) {
                continue;
            }
            let Ok((other_position, other_collider, _)) = units.get(candidate) else {
                continue;
            };
            if collider.overlaps(position, other_collider, other_position.pos) {
                let dist = position.distance(other_position.pos);
                if dist < min_dist {
                    min_dist = dist;
                    nearest = Some(candidate);
                }
            }
        }

        let Some(opponent) = nearest else {
            if let Ok((_, _, mut unit)) = units.get_mut(entity)
                && (unit.in_combat || !unit.engaged_with.is_empty())
            {
                unit.disengage();
            }
            continue;
        };

        // Mark the pair and make sure both sides share one start stamp.
        let (unit_damage, started) = {
            let Ok((_, _, mut unit)) = units.get_mut(entity) else {
                continue;
            };
            unit.in_combat = true;
            let started = *unit.engaged_with.entry(opponent).or_insert(now);
            (unit.damage, started)
        };
        let foe_damage = {
            let Ok((_, _, mut foe)) = units.get_mut(opponent) else {
                continue;
            };
            foe.in_combat = true;
            foe.engaged_with.insert(entity, started);
            foe.damage
        };

        if now - started >= config.combat_delay {
            let mut died = [false; 2];
            for (slot, target, source, incoming) in [
                (0, entity, opponent, foe_damage),
                (1, opponent, entity, unit_damage),
            ] {
                if let Ok((_, _, mut unit)) = units.get_mut(target) {
                    exchange_blow(&mut unit, source, incoming, now);
                    scene.write(SceneCmd::HealthBar {
                        entity: target,
                        scale: unit.hp_bar_scale(),
                    });
                    died[slot] = unit.is_dead();
                }
            }
            debug!(
                "{:?} and {:?} traded blows ({} / {})",
                entity, opponent, unit_damage, foe_damage
            );

            let [unit_died, foe_died] = died;
            if unit_died {
                dead.push((faction, entity));
                dead_set.insert(entity);
            }
            if foe_died {
                dead.push((faction.opponent(), opponent));
                dead_set.insert(opponent);
                // The survivor is free to re-engage or move on next tick.
                if !unit_died && let Ok((_, _, mut unit)) = units.get_mut(entity) {
                    unit.disengage();
                }
            }
        }
    }

    if dead.is_empty() {
        return;
    }

    for &(faction, entity) in &dead {
        if !rosters.remove(faction, entity) {
            continue;
        }
        if faction == Faction::Enemy
            && let Ok((_, _, unit)) = units.get(entity)
        {
            ledger.award(unit.reward);
        }
        debug!("{} unit {:?} died", faction.name(), entity);
        commands.entity(entity).despawn();
        scene.write(SceneCmd::Detach { entity });
    }

    for (_, _, mut unit) in units.iter_mut() {
        if unit.engaged_with.keys().any(|e| dead_set.contains(e)) {
            unit.engaged_with.retain(|e, _| !dead_set.contains(e));
            if unit.engaged_with.is_empty() {
                unit.in_combat = false;
            }
        }
    }
}
