//! Entity, relation, and world storage for the Relational Primitive Engine.
//!
//! This crate provides:
//! - [`Entity`] - Identity plus a typed property bag
//! - [`Relation`] - Primitive-tagged edges and unary properties
//! - [`SpatialIndex`] - Uniform-grid proximity index
//! - [`World`] - The mutable aggregate root with derived relation indices

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod entity;
pub mod relation;
pub mod spatial;
pub mod world;

pub use config::WorldConfig;
pub use entity::Entity;
pub use relation::Relation;
pub use spatial::{Cell, DEFAULT_CELL_SIZE, SpatialIndex};
pub use world::World;
