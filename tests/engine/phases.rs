//! Integration tests for phase ordering

use std::cell::RefCell;
use std::rc::Rc;

use rpe_engine::{Engine, Phase, keys};
use rpe_storage::World;

type Log = Rc<RefCell<Vec<String>>>;

fn log_rule(log: &Log, label: impl Into<String>) -> impl FnMut(&mut World) + 'static {
    let log = Rc::clone(log);
    let label = label.into();
    move |_: &mut World| log.borrow_mut().push(label.clone())
}

#[test]
fn full_phase_order_with_builtins() {
    let log: Log = Rc::default();
    let mut engine = Engine::default();
    let e = engine.world_mut().create_entity("e", "agent");
    e.set_state(keys::X, 0.0_f32);
    e.set_state(keys::Y, 0.0_f32);
    e.set_state(keys::HEALTH, 500.0_f64);

    // Observe each built-in from the phase that follows it.
    let seen = Rc::clone(&log);
    engine.register_geometry_rule("geometry", log_rule(&log, "geometry"));
    engine.register_constraint_rule("constraint", move |w: &mut World| {
        if w.spatial_index().contains("e") {
            seen.borrow_mut().push("synced".into());
        }
        seen.borrow_mut().push("constraint".into());
    });
    let seen = Rc::clone(&log);
    engine.register_epistemic_rule("epistemic", move |w: &mut World| {
        if w.entity("e").unwrap().number(keys::HEALTH) == Some(100.0) {
            seen.borrow_mut().push("clamped".into());
        }
        seen.borrow_mut().push("epistemic".into());
    });
    engine.register_dynamics_rule("dynamics", |w: &mut World| {
        w.entity_mut("e").unwrap().set_state(keys::HEALTH, 0.0_f64);
    });
    engine.register_meta_rule("meta", log_rule(&log, "meta"));
    let seen = Rc::clone(&log);
    engine.register_gco_rule("gco", move |w: &mut World| {
        if !w.contains_entity("e") {
            seen.borrow_mut().push("swept".into());
        }
        seen.borrow_mut().push("gco".into());
    });

    engine.tick().unwrap();
    assert_eq!(
        *log.borrow(),
        [
            "geometry",
            "synced",
            "constraint",
            "clamped",
            "epistemic",
            "meta",
            "swept",
            "gco"
        ]
    );
}

#[test]
fn every_phase_runs_every_tick() {
    let log: Log = Rc::default();
    let mut engine = Engine::default();
    for phase in Phase::ALL {
        engine.register_rule(phase, phase.as_str(), log_rule(&log, phase.as_str()));
    }

    engine.tick().unwrap();
    engine.tick().unwrap();
    assert_eq!(log.borrow().len(), 12);
    assert_eq!(log.borrow()[6], "GEOMETRY");
}

#[test]
fn mutations_are_visible_to_later_phases() {
    let mut engine = Engine::default();
    engine.world_mut().create_entity("seed", "producer");

    engine.register_epistemic_rule("sprout", |w: &mut World| {
        w.entity_mut("seed").unwrap().set_state("height", 1);
    });
    engine.register_dynamics_rule("grow", |w: &mut World| {
        let seed = w.entity_mut("seed").unwrap();
        let height = seed.get_state("height", 0);
        seed.set_state("height", height * 10);
    });

    engine.tick().unwrap();
    assert_eq!(engine.world().entity("seed").unwrap().get_state("height", 0), 10);
}

#[test]
fn run_single_phase() {
    let mut engine = Engine::default();
    let e = engine.world_mut().create_entity("e", "agent");
    e.set_state(keys::X, 3.0_f64);
    e.set_state(keys::Y, 4.0_f64);

    let report = engine.run_phase(Phase::Geometry).unwrap();
    assert_eq!(report.synced, 1);
    assert!(engine.world().spatial_index().contains("e"));
    assert!(engine.world().entity("e").unwrap().is_dirty());
    assert_eq!(engine.world().current_tick(), 0);
}
