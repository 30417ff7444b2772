//! RPE - Relational Primitive Engine
//!
//! This crate re-exports all layers of the engine for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: rpe_engine     - Phases, rules, built-in passes, tick loop
//! Layer 1: rpe_storage    - Entities, relations, spatial index, world
//! Layer 0: rpe_foundation - Core types (EntityId, Value, Primitive, Error)
//! ```
//!
//! # Example
//!
//! ```
//! use rpe::engine::{Engine, keys};
//! use rpe::storage::World;
//!
//! let mut world = World::new();
//! let deer = world.create_entity("deer", "consumer");
//! deer.set_state(keys::HEALTH, 100.0_f64);
//! deer.set_state(keys::ENERGY, 120.0_f64);
//!
//! let mut engine = Engine::new(world);
//! engine.register_dynamics_rule("metabolism", |w: &mut World| {
//!     for entity in w.entities_mut() {
//!         let energy = entity.get_state(keys::ENERGY, 0.0_f64);
//!         entity.set_state(keys::ENERGY, energy - 1.0);
//!     }
//! });
//!
//! engine.tick().unwrap();
//! let deer = engine.world().entity("deer").unwrap();
//! assert_eq!(deer.get_state(keys::ENERGY, 0.0_f64), 99.0);
//! ```

pub use rpe_engine as engine;
pub use rpe_foundation as foundation;
pub use rpe_storage as storage;
