//! Integration tests for Error types

use rpe_foundation::{Error, ErrorContext, ErrorKind};

#[test]
fn rule_failure_keeps_its_source() {
    let err = Error::rule_failed("DYNAMICS", "grazing", "no grass".into());
    assert_eq!(err.failed_rule(), Some("grazing"));

    let source = std::error::Error::source(&err.kind).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("no grass"));
}

#[test]
fn display_names_phase_and_rule() {
    let err = Error::rule_failed("META", "reaper", "boom".into());
    let text = err.to_string();
    assert!(text.contains("META"));
    assert!(text.contains("reaper"));
}

#[test]
fn context_is_attached() {
    let err = Error::invalid_cell_size(0.0)
        .with_context(ErrorContext::new().with_tick(4).with_entity("deer"));
    assert!(matches!(err.kind, ErrorKind::InvalidCellSize(_)));
    let context = err.context.unwrap();
    assert_eq!(context.tick, Some(4));
    assert_eq!(context.to_string(), "at tick 4, entity deer");
}
