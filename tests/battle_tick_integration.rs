//! Battle tick integration tests for movement, engagement and removal.

use bevy_ecs::prelude::*;
use glam::Vec3;

use lanesiege::components::faction::Faction;
use lanesiege::components::mapposition::MapPosition;
use lanesiege::components::unit::Unit;
use lanesiege::game::{battle_schedule, init_battle};
use lanesiege::resources::battlestate::{BattleOutcome, BattleState};
use lanesiege::resources::catalog::UnitCatalog;
use lanesiege::resources::economy::EconomyLedger;
use lanesiege::resources::rosters::Rosters;
use lanesiege::resources::scenebridge::setup_scene_bridge;
use lanesiege::resources::simconfig::SimConfig;
use lanesiege::resources::simrng::SimRng;
use lanesiege::resources::spawner::SpawnScheduler;
use lanesiege::resources::worldtime::WorldTime;
use lanesiege::systems::engagement::engagement;
use lanesiege::systems::movement::movement;
use lanesiege::systems::spawn::spawn_unit;
use lanesiege::systems::time::update_world_time;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Bases on the x axis, 100 units apart, spawner off.
fn test_config() -> SimConfig {
    let mut config = SimConfig::new();
    config.player_base_position = Vec3::new(0.0, 0.0, 0.0);
    config.enemy_base_position = Vec3::new(100.0, 0.0, 0.0);
    config
}

fn make_world(config: SimConfig) -> World {
    let mut world = World::new();
    // The receiver is dropped; forwarding to a closed channel is harmless.
    let _ = setup_scene_bridge(&mut world);
    init_battle(&mut world, config, UnitCatalog::builtin(), SimRng::with_seed(3));
    world.resource_mut::<SpawnScheduler>().stop();
    world
}

fn place(world: &mut World, kind: &str, faction: Faction, pos: Vec3) -> Entity {
    let entity = spawn_unit(world, kind, faction).unwrap();
    world.get_mut::<MapPosition>(entity).unwrap().pos = pos;
    entity
}

fn unit(world: &World, entity: Entity) -> &Unit {
    world.get::<Unit>(entity).unwrap()
}

fn tick_engagement(world: &mut World, dt: f32) {
    update_world_time(world, dt);
    let mut schedule = Schedule::default();
    schedule.add_systems(engagement);
    schedule.run(world);
}

fn tick_movement(world: &mut World, dt: f32) {
    update_world_time(world, dt);
    let mut schedule = Schedule::default();
    schedule.add_systems(movement);
    schedule.run(world);
}

// ==================== ENGAGEMENT ====================

#[test]
fn overlapping_opponents_engage_within_one_tick() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let e = place(&mut world, "basic", Faction::Enemy, Vec3::new(50.0, 0.0, 0.0));

    tick_engagement(&mut world, 0.0);

    assert!(unit(&world, p).in_combat);
    assert!(unit(&world, e).in_combat);
    assert_eq!(unit(&world, p).engaged_with.get(&e), Some(&0.0));
    assert_eq!(unit(&world, e).engaged_with.get(&p), Some(&0.0));
}

#[test]
fn units_of_same_faction_never_engage() {
    let mut world = make_world(test_config());
    let a = place(&mut world, "basic", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let b = place(&mut world, "basic", Faction::Player, Vec3::new(41.0, 0.0, 0.0));

    tick_engagement(&mut world, 0.0);

    assert!(!unit(&world, a).in_combat);
    assert!(!unit(&world, b).in_combat);
}

#[test]
fn no_damage_before_combat_delay() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let e = place(&mut world, "basic", Faction::Enemy, Vec3::new(50.0, 0.0, 0.0));

    tick_engagement(&mut world, 0.0);
    for _ in 0..3 {
        tick_engagement(&mut world, 0.5);
        assert_eq!(unit(&world, p).hp, 10);
        assert_eq!(unit(&world, e).hp, 10);
    }

    // elapsed == 2.0
    tick_engagement(&mut world, 0.5);
    assert_eq!(unit(&world, p).hp, 8);
    assert_eq!(unit(&world, e).hp, 8);
    assert!(approx_eq(unit(&world, p).hp_bar_scale(), 0.8));
}

#[test]
fn engaged_pair_trades_once_per_delay() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let e = place(&mut world, "heavy", Faction::Enemy, Vec3::new(50.0, 0.0, 0.0));

    tick_engagement(&mut world, 0.0);
    let mut history = Vec::new();
    for _ in 0..8 {
        tick_engagement(&mut world, 0.5);
        history.push((unit(&world, p).hp, unit(&world, e).hp));
    }

    // basic deals 2, heavy deals 4; exchanges at t=2.0 and t=4.0 only.
    assert_eq!(
        history,
        vec![
            (10, 20),
            (10, 20),
            (10, 20),
            (6, 18),
            (6, 18),
            (6, 18),
            (6, 18),
            (2, 16)
        ]
    );
    assert_eq!(unit(&world, p).last_attack_time, Some(4.0));
    assert_eq!(unit(&world, e).last_attack_time, Some(4.0));
}

#[test]
fn nearest_overlapping_opponent_is_chosen() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let far = place(&mut world, "basic", Faction::Enemy, Vec3::new(55.0, 0.0, 0.0));
    let near = place(&mut world, "basic", Faction::Enemy, Vec3::new(45.0, 0.0, 0.0));

    tick_engagement(&mut world, 0.0);

    let engaged = &unit(&world, p).engaged_with;
    assert!(engaged.contains_key(&near));
    assert!(!engaged.contains_key(&far));
}

#[test]
fn distance_tie_goes_to_first_in_roster() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let first = place(&mut world, "basic", Faction::Enemy, Vec3::new(45.0, 0.0, 0.0));
    let second = place(&mut world, "basic", Faction::Enemy, Vec3::new(35.0, 0.0, 0.0));

    tick_engagement(&mut world, 0.0);

    let engaged = &unit(&world, p).engaged_with;
    assert!(engaged.contains_key(&first));
    assert!(!engaged.contains_key(&second));
}

#[test]
fn separated_units_disengage() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let e = place(&mut world, "basic", Faction::Enemy, Vec3::new(50.0, 0.0, 0.0));

    tick_engagement(&mut world, 0.0);
    assert!(unit(&world, p).in_combat);

    world.get_mut::<MapPosition>(e).unwrap().pos = Vec3::new(50.0, 0.0, 30.0);
    tick_engagement(&mut world, 0.5);

    assert!(!unit(&world, p).in_combat);
    assert!(!unit(&world, e).in_combat);
    assert!(unit(&world, p).engaged_with.is_empty());
    assert!(unit(&world, e).engaged_with.is_empty());
}

#[test]
fn simultaneous_death_removes_both_exactly_once() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let e = place(&mut world, "basic", Faction::Enemy, Vec3::new(50.0, 0.0, 0.0));
    world.get_mut::<Unit>(p).unwrap().hp = 2;
    world.get_mut::<Unit>(e).unwrap().hp = 2;
    let money_before = world.resource::<EconomyLedger>().money();

    tick_engagement(&mut world, 0.0);
    for _ in 0..4 {
        tick_engagement(&mut world, 0.5);
    }

    assert!(world.get_entity(p).is_err());
    assert!(world.get_entity(e).is_err());
    let rosters = world.resource::<Rosters>();
    assert!(rosters.player.is_empty());
    assert!(rosters.enemy.is_empty());
    assert_eq!(world.resource::<EconomyLedger>().money(), money_before + 25);
}

#[test]
fn killing_an_enemy_pays_its_archetype_reward() {
    for (kind, reward) in [("basic", 25), ("ranged", 35), ("heavy", 70)] {
        let mut world = make_world(test_config());
        let p = place(&mut world, "heavy", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
        let e = place(&mut world, kind, Faction::Enemy, Vec3::new(50.0, 0.0, 0.0));
        world.get_mut::<Unit>(p).unwrap().damage = 1000;
        let money_before = world.resource::<EconomyLedger>().money();

        tick_engagement(&mut world, 0.0);
        tick_engagement(&mut world, 2.0);

        assert!(world.get_entity(e).is_err(), "{kind} should be dead");
        assert_eq!(
            world.resource::<EconomyLedger>().money(),
            money_before + reward,
            "reward for {kind}"
        );
    }
}

#[test]
fn player_deaths_pay_nothing() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let e = place(&mut world, "heavy", Faction::Enemy, Vec3::new(50.0, 0.0, 0.0));
    world.get_mut::<Unit>(e).unwrap().damage = 1000;
    let money_before = world.resource::<EconomyLedger>().money();

    tick_engagement(&mut world, 0.0);
    tick_engagement(&mut world, 2.0);

    assert!(world.get_entity(p).is_err());
    assert_eq!(world.resource::<EconomyLedger>().money(), money_before);
    // The enemy that won is free again.
    let survivor = unit(&world, e);
    assert!(!survivor.in_combat);
    assert!(survivor.engaged_with.is_empty());
    assert_eq!(survivor.hp, 18);
}

#[test]
fn survivor_is_released_when_opponent_dies() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "heavy", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let e = place(&mut world, "basic", Faction::Enemy, Vec3::new(50.0, 0.0, 0.0));
    world.get_mut::<Unit>(p).unwrap().damage = 1000;

    tick_engagement(&mut world, 0.0);
    tick_engagement(&mut world, 2.0);

    assert!(world.get_entity(e).is_err());
    let survivor = unit(&world, p);
    assert!(!survivor.in_combat);
    assert!(survivor.engaged_with.is_empty());
    assert_eq!(survivor.hp, 18);
}

#[test]
fn removal_keeps_roster_order() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "heavy", Faction::Player, Vec3::new(40.0, 0.0, 0.0));
    let e1 = place(&mut world, "basic", Faction::Enemy, Vec3::new(90.0, 0.0, 30.0));
    let e2 = place(&mut world, "basic", Faction::Enemy, Vec3::new(50.0, 0.0, 0.0));
    let e3 = place(&mut world, "basic", Faction::Enemy, Vec3::new(90.0, 0.0, -30.0));
    world.get_mut::<Unit>(p).unwrap().damage = 1000;

    tick_engagement(&mut world, 0.0);
    tick_engagement(&mut world, 2.0);

    assert!(world.get_entity(e2).is_err());
    assert_eq!(world.resource::<Rosters>().enemy, vec![e1, e3]);
}

// ==================== MOVEMENT ====================

#[test]
fn unit_steps_toward_enemy_base() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(20.0, 0.0, 0.0));
    let speed = unit(&world, p).speed;

    tick_movement(&mut world, 0.5);

    let pos = world.get::<MapPosition>(p).unwrap().pos;
    assert!(approx_eq(pos.x, 20.0 + speed * 0.5 * 60.0));
    assert!(approx_eq(pos.y, 0.0));
    assert!(approx_eq(pos.z, 0.0));
}

#[test]
fn enemies_march_on_player_base() {
    let mut world = make_world(test_config());
    let e = place(&mut world, "basic", Faction::Enemy, Vec3::new(80.0, 0.0, 0.0));

    tick_movement(&mut world, 0.1);

    assert!(world.get::<MapPosition>(e).unwrap().pos.x < 80.0);
}

#[test]
fn queued_unit_waits_behind_predecessor() {
    let mut world = make_world(test_config());
    let lead = place(&mut world, "basic", Faction::Player, Vec3::new(20.0, 0.0, 0.0));
    let queued = place(&mut world, "basic", Faction::Player, Vec3::new(17.0, 0.0, 0.0));
    // Make the lead slow so it stays within spacing after its step.
    world.get_mut::<Unit>(lead).unwrap().speed = 0.0;

    // Three units apart: free to advance.
    let speed = unit(&world, queued).speed;
    tick_movement(&mut world, 0.5);
    let x = world.get::<MapPosition>(queued).unwrap().pos.x;
    assert!(approx_eq(x, 17.0 + speed * 30.0));

    world.get_mut::<MapPosition>(queued).unwrap().pos = Vec3::new(18.0, 0.0, 0.0);
    tick_movement(&mut world, 0.5);
    assert!(approx_eq(world.get::<MapPosition>(queued).unwrap().pos.x, 18.0));
}

#[test]
fn units_in_combat_hold_position() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(20.0, 0.0, 0.0));
    world.get_mut::<Unit>(p).unwrap().in_combat = true;

    tick_movement(&mut world, 0.5);

    assert!(approx_eq(world.get::<MapPosition>(p).unwrap().pos.x, 20.0));
}

#[test]
fn unit_at_stop_distance_attacks_base_on_cooldown() {
    let mut world = make_world(test_config());
    // Exactly 15 from the enemy base: arrived.
    let p = place(&mut world, "basic", Faction::Player, Vec3::new(85.0, 0.0, 0.0));

    tick_movement(&mut world, 0.0);
    assert!(approx_eq(world.get::<MapPosition>(p).unwrap().pos.x, 85.0));
    assert_eq!(world.resource::<EconomyLedger>().base_hp(Faction::Enemy), 99_998);

    // basic cooldown is 1.0s and the check is strict.
    tick_movement(&mut world, 0.5);
    tick_movement(&mut world, 0.5);
    assert_eq!(world.resource::<EconomyLedger>().base_hp(Faction::Enemy), 99_998);

    tick_movement(&mut world, 0.5);
    assert_eq!(world.resource::<EconomyLedger>().base_hp(Faction::Enemy), 99_996);
    assert_eq!(unit(&world, p).last_attack_time, Some(1.5));
}

#[test]
fn player_base_destruction_is_a_defeat() {
    let mut config = test_config();
    config.player_base_hp = 3;
    let mut world = make_world(config);
    place(&mut world, "basic", Faction::Enemy, Vec3::new(10.0, 0.0, 0.0));

    tick_movement(&mut world, 0.0);
    assert_eq!(world.resource::<EconomyLedger>().base_hp(Faction::Player), 1);
    assert!(!world.resource::<BattleState>().is_over());

    tick_movement(&mut world, 1.5);
    let ledger = world.resource::<EconomyLedger>();
    assert_eq!(ledger.base_hp(Faction::Player), 0);
    assert!(ledger.is_defeat());
    assert_eq!(
        world.resource::<BattleState>().outcome(),
        Some(BattleOutcome::Defeat)
    );

    // Further hits keep the base at zero.
    tick_movement(&mut world, 1.5);
    assert_eq!(world.resource::<EconomyLedger>().base_hp(Faction::Player), 0);
}

#[test]
fn enemy_base_destruction_is_a_victory() {
    let mut config = test_config();
    config.enemy_base_hp = 2;
    let mut world = make_world(config);
    place(&mut world, "basic", Faction::Player, Vec3::new(90.0, 0.0, 0.0));

    tick_movement(&mut world, 0.0);

    assert_eq!(
        world.resource::<BattleState>().outcome(),
        Some(BattleOutcome::Victory)
    );
}

// ==================== FULL SCHEDULE ====================

#[test]
fn hp_stays_within_bounds_every_tick() {
    let mut config = test_config();
    config.spawn_cap = 4;
    let mut world = make_world(config);
    world.resource_mut::<SpawnScheduler>().start(0.0);
    for i in 0..4 {
        let kind = ["basic", "ranged", "heavy", "basic"][i];
        place(&mut world, kind, Faction::Player, Vec3::new(5.0 - 3.0 * i as f32, 0.0, 0.0));
    }

    let mut schedule = battle_schedule();
    for _ in 0..(60 * 90) {
        update_world_time(&mut world, 1.0 / 60.0);
        schedule.run(&mut world);

        let mut query = world.query::<&Unit>();
        for unit in query.iter(&world) {
            assert!(unit.hp >= 0 && unit.hp <= unit.max_hp);
        }
    }
    assert!(world.resource::<WorldTime>().elapsed > 89.0);
}

#[test]
fn armies_meet_and_fight_in_the_lane() {
    let mut world = make_world(test_config());
    let p = place(&mut world, "heavy", Faction::Player, Vec3::new(10.0, 0.0, 0.0));
    let e = place(&mut world, "basic", Faction::Enemy, Vec3::new(90.0, 0.0, 0.0));

    let mut schedule = battle_schedule();
    let mut met = false;
    for _ in 0..(60 * 20) {
        update_world_time(&mut world, 1.0 / 60.0);
        schedule.run(&mut world);
        if world.get_entity(e).is_err() {
            break;
        }
        met |= unit(&world, p).in_combat;
    }

    assert!(met, "units should have engaged");
    assert!(world.get_entity(e).is_err(), "heavy should beat basic");
    assert!(world.get_entity(p).is_ok());
    assert_eq!(world.resource::<EconomyLedger>().money(), 50 + 25);
}
