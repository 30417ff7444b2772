//! Phased tick engine for the Relational Primitive Engine.
//!
//! This crate provides:
//! - [`Phase`] - The six tick phases in execution order
//! - [`Engine`] - Rule registration and the tick loop over an owned world
//! - [`builtin`] - Spatial sync, vital clamps, and the death sweep
//! - [`TraceBuffer`] - Bounded diagnostic trace recorded while verbose

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtin;
pub mod config;
pub mod engine;
pub mod phase;
pub mod rule;
pub mod trace;

pub use builtin::{Clamp, DEFAULT_MAX_ENERGY, DEFAULT_MAX_HEALTH, keys};
pub use config::EngineConfig;
pub use engine::{Engine, TickReport};
pub use phase::Phase;
pub use rule::{Rule, RuleFn, RuleRegistry};
pub use trace::{DEFAULT_TRACE_CAPACITY, TraceBuffer, TraceEvent, TraceRecord};
