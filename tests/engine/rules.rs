//! Integration tests for rule registration and failure semantics

use rpe_engine::{Engine, Phase};
use rpe_foundation::ErrorKind;
use rpe_storage::World;

#[test]
fn registry_reports_names_per_phase() {
    let mut engine = Engine::default();
    engine.register_dynamics_rule("grazing", |_: &mut World| {});
    engine.register_dynamics_rule("predation", |_: &mut World| {});
    engine.register_gco_rule("dedup", |_: &mut World| {});

    assert_eq!(engine.rules().names(Phase::Dynamics), ["grazing", "predation"]);
    assert_eq!(engine.rules().names(Phase::Gco), ["dedup"]);
    assert_eq!(engine.rules().len(), 3);
}

#[test]
fn rules_can_be_added_between_ticks() {
    let mut engine = Engine::default();
    engine.world_mut().create_entity("c", "counter").set_state("n", 0);
    let bump = |w: &mut World| {
        let c = w.entity_mut("c").unwrap();
        let n = c.get_state("n", 0);
        c.set_state("n", n + 1);
    };

    engine.register_dynamics_rule("bump", bump);
    engine.tick().unwrap();
    engine.register_dynamics_rule("bump", bump);
    engine.tick().unwrap();

    assert_eq!(engine.world().entity("c").unwrap().get_state("n", 0), 3);
}

#[test]
fn stateful_rules_keep_their_state() {
    let mut engine = Engine::default();
    engine.world_mut().create_entity("clock", "meta");
    let mut calls = 0;
    engine.register_meta_rule("count", move |w: &mut World| {
        calls += 1;
        w.entity_mut("clock").unwrap().set_state("calls", calls);
    });

    for _ in 0..3 {
        engine.tick().unwrap();
    }
    assert_eq!(engine.world().entity("clock").unwrap().get_state("calls", 0), 3);
}

#[test]
fn fallible_rule_success_is_transparent() {
    let mut engine = Engine::default();
    engine.register_fallible_rule(Phase::Gco, "check", |_: &mut World| Ok(()));
    let report = engine.tick().unwrap();
    assert_eq!(report.rules_run, 1);
    assert_eq!(report.tick, 1);
}

#[test]
fn failure_aborts_without_rollback() {
    let mut engine = Engine::default();
    engine.world_mut().create_entity("a", "agent").set_state("x", 1);

    engine.register_constraint_rule("mutate", |w: &mut World| {
        w.entity_mut("a").unwrap().set_state("touched", true);
    });
    engine.register_fallible_rule(Phase::Constraint, "validate", |w: &mut World| {
        if w.entity("a").unwrap().get_state("touched", false) {
            Err("a was touched".into())
        } else {
            Ok(())
        }
    });
    engine.register_dynamics_rule("never", |w: &mut World| {
        w.create_entity("never", "agent");
    });

    let err = engine.tick().unwrap_err();
    assert!(matches!(
        &err.kind,
        ErrorKind::RuleFailed { phase, rule, .. } if phase == "CONSTRAINT" && rule == "validate"
    ));

    let world = engine.world();
    assert!(world.entity("a").unwrap().get_state("touched", false));
    assert!(!world.contains_entity("never"));
    assert_eq!(world.current_tick(), 0);
    assert!(world.dirty_entities().contains("a"));
}

#[test]
fn engine_recovers_after_failure() {
    let mut engine = Engine::default();
    let mut fail_once = true;
    engine.register_fallible_rule(Phase::Meta, "flaky", move |_: &mut World| {
        if std::mem::take(&mut fail_once) {
            Err("transient".into())
        } else {
            Ok(())
        }
    });

    assert!(engine.tick().is_err());
    assert_eq!(engine.tick().unwrap().tick, 1);
}
