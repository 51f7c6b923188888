//! Discovery, identity stability, and visibility filtering through the full
//! scheduler pipeline.

mod common;

use common::{MockAnnouncer, MockDevice, MockRegistry, MockWorld, tone_profile};
use tilesonic::math::Vec2;
use tilesonic::{
    BeaconScheduler, ClusterDef, EntityBeaconSource, EntityInfo, Listener, TileClusterSource,
    TileDef, TileMatchSource, TileSonicConfig, ViewRect,
};

const ORE: u16 = 9;

fn scheduler_with(source: Box<dyn tilesonic::DiscoverySource>) -> BeaconScheduler {
    common::init_logging();
    let mut scheduler = BeaconScheduler::new(TileSonicConfig::new().scan_interval_ticks(1));
    scheduler.add_source(source);
    scheduler
}

#[test]
fn tracked_keys_stable_across_rebuilds() {
    let mut world = MockWorld::new(100, 100);
    world.set_tile(5, 0, ORE);
    world.set_tile(12, 3, ORE);
    let mut scheduler = scheduler_with(Box::new(TileMatchSource::new(
        1,
        40,
        vec![TileDef::new(vec![ORE], tone_profile("ore", 85.0, (30, 60)))],
    )));
    let listener = Listener::new(Vec2::ZERO, 1.0);
    let mut device = MockDevice::default();
    let mut announcer = MockAnnouncer::default();
    let mut registry = MockRegistry::default();

    scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    let mut first: Vec<_> = registry.targets.iter().map(|t| t.key).collect();
    first.sort();

    // Every following pass rebuilds the candidate set from scratch; the keys
    // must come out identical while the world is unchanged.
    for _ in 0..5 {
        scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
        let mut keys: Vec<_> = registry.targets.iter().map(|t| t.key).collect();
        keys.sort();
        assert_eq!(keys, first);
    }
}

#[test]
fn entity_keys_follow_the_moving_entity() {
    let mut world = MockWorld::new(100, 100);
    world.entities.push(EntityInfo {
        slot: 7,
        type_id: 42,
        position: Vec2::new(100.0, 0.0),
        active: true,
        hidden: false,
        defeated: false,
        name: "Lost Explorer".into(),
    });
    let mut scheduler = scheduler_with(Box::new(EntityBeaconSource::new(
        2,
        60.0,
        vec![42],
        tone_profile("character", 100.0, (30, 60)),
    )));
    let listener = Listener::new(Vec2::ZERO, 1.0);
    let mut device = MockDevice::default();
    let mut announcer = MockAnnouncer::default();
    let mut registry = MockRegistry::default();

    scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    let key = registry.targets[0].key;
    assert_eq!(registry.targets[0].label, "Lost Explorer");

    world.entities[0].position = Vec2::new(140.0, 20.0);
    scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    assert_eq!(registry.targets[0].key, key);
    assert_eq!(registry.targets[0].position, Vec2::new(140.0, 20.0));
}

#[test]
fn adjacent_ore_tiles_are_one_candidate() {
    let mut world = MockWorld::new(100, 100);
    world.set_tile(6, 4, ORE);
    world.set_tile(7, 4, ORE);
    let mut scheduler = scheduler_with(Box::new(TileClusterSource::new(
        3,
        40,
        vec![ClusterDef::new(vec![ORE], tone_profile("ore vein", 60.0, (30, 60)))],
    )));
    let listener = Listener::new(Vec2::ZERO, 1.0);
    let mut device = MockDevice::default();
    let mut announcer = MockAnnouncer::default();
    let mut registry = MockRegistry::default();

    scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    assert_eq!(registry.targets.len(), 1);
    assert_eq!(device.played.len(), 1);
}

#[test]
fn beyond_max_audible_distance_is_invisible() {
    let mut world = MockWorld::new(400, 100);
    // 90 tiles away with an 85-tile audible range.
    world.set_tile(90, 0, ORE);
    let mut scheduler = scheduler_with(Box::new(TileMatchSource::new(
        1,
        120,
        vec![TileDef::new(vec![ORE], tone_profile("ore", 85.0, (10, 20)))],
    )));
    let listener = Listener::new(Vec2::ZERO, 1.0);
    let mut device = MockDevice::default();
    let mut announcer = MockAnnouncer::default();
    let mut registry = MockRegistry::default();

    scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    assert!(registry.targets.is_empty());
    assert!(device.played.is_empty());
}

#[test]
fn dark_tiles_are_filtered() {
    let mut world = MockWorld::new(100, 100);
    world.set_tile(5, 0, ORE);
    world.set_light(5, 0, 0.0);
    let mut scheduler = scheduler_with(Box::new(TileMatchSource::new(
        1,
        40,
        vec![TileDef::new(vec![ORE], tone_profile("ore", 85.0, (10, 20)))],
    )));
    let listener = Listener::new(Vec2::ZERO, 1.0);
    let mut device = MockDevice::default();
    let mut announcer = MockAnnouncer::default();
    let mut registry = MockRegistry::default();

    scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    assert!(registry.targets.is_empty());
    assert!(device.played.is_empty());
}

#[test]
fn off_screen_candidates_are_filtered() {
    let mut world = MockWorld::new(100, 100);
    world.set_tile(5, 0, ORE);
    let mut scheduler = scheduler_with(Box::new(TileMatchSource::new(
        1,
        40,
        vec![TileDef::new(vec![ORE], tone_profile("ore", 85.0, (10, 20)))],
    )));
    // View rectangle well away from the candidate at (80, 0).
    let listener = Listener::new(Vec2::ZERO, 1.0)
        .with_view(ViewRect::around(Vec2::new(-500.0, 0.0), Vec2::new(100.0, 100.0)));
    let mut device = MockDevice::default();
    let mut announcer = MockAnnouncer::default();
    let mut registry = MockRegistry::default();

    scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    assert!(registry.targets.is_empty());
    assert!(device.played.is_empty());
}

#[test]
fn vanished_feature_stops_being_tracked() {
    let mut world = MockWorld::new(100, 100);
    world.set_tile(5, 0, ORE);
    let mut scheduler = scheduler_with(Box::new(TileMatchSource::new(
        1,
        40,
        vec![TileDef::new(vec![ORE], tone_profile("ore", 85.0, (2, 4)))],
    )));
    let listener = Listener::new(Vec2::ZERO, 1.0);
    let mut device = MockDevice::default();
    let mut announcer = MockAnnouncer::default();
    let mut registry = MockRegistry::default();

    scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    assert_eq!(registry.targets.len(), 1);

    world.clear_tile(5, 0);
    scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    assert!(registry.targets.is_empty());

    // Mining out the vein while a cue cooldown was pending must not leak
    // bookkeeping: once the tile returns it is treated as a fresh sighting
    // and may cue immediately.
    for _ in 0..3 {
        scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    }
    world.set_tile(5, 0, ORE);
    let before = device.played.len();
    scheduler.update(&world, &listener, &mut device, &mut announcer, &mut registry);
    assert_eq!(device.played.len(), before + 1);
}
