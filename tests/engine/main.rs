//! Integration tests for Layer 2: Engine
//!
//! Tests for phase ordering, rule registration, built-in passes, and tracing.

mod builtins;
mod phases;
mod rules;
