//! Core types shared by every layer of the Relational Primitive Engine.
//!
//! This crate provides:
//! - [`EntityId`] - Cheaply cloneable string identifiers
//! - [`Value`] - The closed property/payload variant with typed reads
//! - [`Primitive`] - The six relational primitives
//! - [`Vec2`] and [`Aabb`] - Planar geometry used by the spatial index
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod geometry;
pub mod primitive;
pub mod value;

pub use entity::EntityId;
pub use error::{Error, ErrorContext, ErrorKind, RuleError};
pub use geometry::{Aabb, Vec2};
pub use primitive::Primitive;
pub use value::{FromValue, Value, ValueKind};

/// Result type alias using the RPE error type.
pub type Result<T> = std::result::Result<T, Error>;
