//! Integration tests for the built-in passes

use std::cell::RefCell;
use std::rc::Rc;

use rpe_engine::{DEFAULT_MAX_ENERGY, DEFAULT_MAX_HEALTH, Engine, keys};
use rpe_foundation::{EntityId, Value, Vec2};
use rpe_storage::World;

#[test]
fn default_maxima() {
    assert_eq!(DEFAULT_MAX_HEALTH, 100.0);
    assert_eq!(DEFAULT_MAX_ENERGY, 100.0);
}

#[test]
fn clamps_respect_custom_maxima() {
    let mut engine = Engine::default();
    let e = engine.world_mut().create_entity("titan", "agent");
    e.set_state(keys::HEALTH, 900);
    e.set_state(keys::MAX_HEALTH, 500);
    e.set_state(keys::ENERGY, 300.0_f32);
    e.set_state(keys::MAX_ENERGY, 250.0_f32);

    let report = engine.tick().unwrap();
    let titan = engine.world().entity("titan").unwrap();
    assert_eq!(titan.state(keys::HEALTH), Some(&Value::Int(500)));
    assert_eq!(titan.state(keys::ENERGY), Some(&Value::Float(250.0)));
    assert_eq!(report.clamped.len(), 2);
    assert_eq!(report.clamped_entities(), 1);
}

#[test]
fn integer_health_respects_fractional_max() {
    let mut engine = Engine::default();
    let e = engine.world_mut().create_entity("sapling", "producer");
    e.set_state(keys::HEALTH, 100);
    e.set_state(keys::MAX_HEALTH, 99.5_f64);

    let report = engine.tick().unwrap();
    assert_eq!(report.clamped.len(), 1);
    let sapling = engine.world().entity("sapling").unwrap();
    assert_eq!(sapling.state(keys::HEALTH), Some(&Value::Int(99)));
    assert!(engine.tick().unwrap().clamped.is_empty());
}

#[test]
fn clamping_is_idempotent_across_ticks() {
    let mut engine = Engine::default();
    engine.world_mut().create_entity("e", "agent").set_state(keys::ENERGY, -20.0_f64);

    assert_eq!(engine.tick().unwrap().clamped.len(), 1);
    assert!(engine.tick().unwrap().clamped.is_empty());
    assert_eq!(engine.world().entity("e").unwrap().number(keys::ENERGY), Some(0.0));
}

#[test]
fn in_range_values_are_untouched() {
    let mut engine = Engine::default();
    let e = engine.world_mut().create_entity("e", "agent");
    e.set_state(keys::HEALTH, 50.0_f64);
    e.set_state(keys::ENERGY, 0);

    assert!(engine.tick().unwrap().clamped.is_empty());
}

#[test]
fn spatial_sync_tracks_movement() {
    let mut engine = Engine::default();
    let e = engine.world_mut().create_entity("walker", "agent");
    e.set_state(keys::X, 0.0_f32);
    e.set_state(keys::Y, 0.0_f32);
    engine.register_dynamics_rule("walk", |w: &mut World| {
        let walker = w.entity_mut("walker").unwrap();
        let x = walker.get_state(keys::X, 0.0_f32);
        walker.set_state(keys::X, x + 40.0);
    });

    for _ in 0..3 {
        engine.tick().unwrap();
    }
    // The sync at the start of tick 3 saw x = 80; the last move is not yet synced.
    let index = engine.world().spatial_index();
    assert_eq!(index.position("walker"), Some(Vec2::new(80.0, 0.0)));
    assert_eq!(engine.world().entity("walker").unwrap().get_state(keys::X, 0.0_f32), 120.0);
}

#[test]
fn entities_without_position_are_not_indexed() {
    let mut engine = Engine::default();
    engine.world_mut().create_entity("idea", "abstract");
    engine.tick().unwrap();
    assert!(engine.world().spatial_index().is_empty());
}

#[test]
fn death_sweep_clears_every_trace_of_the_dead() {
    let mut engine = Engine::default();
    let e = engine.world_mut().create_entity("moth", "consumer");
    e.set_state(keys::X, 1.0_f32);
    e.set_state(keys::Y, 1.0_f32);
    e.set_state(keys::HEALTH, 1.0_f64);
    engine.register_dynamics_rule("flame", |w: &mut World| {
        w.entity_mut("moth").unwrap().set_state(keys::HEALTH, -1.0_f64);
    });

    let report = engine.tick().unwrap();
    assert_eq!(report.removed, [EntityId::from("moth")]);
    let world = engine.world();
    assert!(world.entity("moth").is_none());
    assert!(!world.spatial_index().contains("moth"));
    assert!(world.dirty_entities().is_empty());
}

#[test]
fn entities_without_health_never_die() {
    let mut engine = Engine::default();
    engine.world_mut().create_entity("rock", "terrain");
    engine.world_mut().create_entity("ghost", "spirit").set_state(keys::HEALTH, "none");
    engine.tick().unwrap();
    assert_eq!(engine.world().entity_count(), 2);
}

#[test]
fn recreating_an_entity_drops_its_position_until_next_sync() {
    let mut engine = Engine::default();
    let e = engine.world_mut().create_entity("deer", "consumer");
    e.set_state(keys::X, 5.0_f32);
    e.set_state(keys::Y, 5.0_f32);
    engine.tick().unwrap();
    assert_eq!(engine.world().spatial_index().position("deer"), Some(Vec2::new(5.0, 5.0)));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    engine.register_dynamics_rule("respawn", |w: &mut World| {
        if w.current_tick() == 1 {
            let deer = w.create_entity("deer", "consumer");
            deer.set_state(keys::X, 40.0_f32);
            deer.set_state(keys::Y, 0.0_f32);
        }
    });
    engine.register_meta_rule("observe", move |w: &mut World| {
        log.borrow_mut().push(w.spatial_index().position("deer"));
    });

    engine.tick().unwrap();
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0], None);
    assert!(engine.world().contains_entity("deer"));
    assert!(!engine.world().spatial_index().contains("deer"));

    engine.tick().unwrap();
    assert_eq!(seen.borrow()[1], Some(Vec2::new(40.0, 0.0)));
}
