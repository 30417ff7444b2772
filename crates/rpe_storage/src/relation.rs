//! Typed relations between entities.
//!
//! A relation is an edge (or, with no target, a unary property) tagged with
//! one of the six relational primitives. Relations hold entity ids, never
//! references, so a relation may outlive the entities it names.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rpe_foundation::{EntityId, FromValue, Primitive, Value};

/// A typed edge or unary property.
///
/// Immutable once built. The payload is attached with
/// [`with_payload`](Self::with_payload) before the relation is handed to the
/// world.
///
/// # Flow direction
///
/// For binary relations, whatever the relation carries (energy, food,
/// influence) flows from the source to the target. An edge `acorns ->
/// squirrel` of type `"influence"` therefore reads "acorns feed the
/// squirrel". Rules should use [`flows_from`](Self::flows_from) and
/// [`flows_to`](Self::flows_to) rather than guessing direction from entity
/// kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Relation {
    primitive: Primitive,
    source: EntityId,
    target: Option<EntityId>,
    relation_type: String,
    payload: Option<Value>,
}

impl Relation {
    /// Creates a unary relation (a property of `source`).
    #[must_use]
    pub fn unary(
        primitive: Primitive,
        source: impl Into<EntityId>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            primitive,
            source: source.into(),
            target: None,
            relation_type: relation_type.into(),
            payload: None,
        }
    }

    /// Creates a binary relation from `source` to `target`.
    #[must_use]
    pub fn binary(
        primitive: Primitive,
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            primitive,
            source: source.into(),
            target: Some(target.into()),
            relation_type: relation_type.into(),
            payload: None,
        }
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Returns the relational primitive.
    #[must_use]
    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// Returns the source entity id.
    #[must_use]
    pub fn source(&self) -> &EntityId {
        &self.source
    }

    /// Returns the target entity id, or `None` for unary relations.
    #[must_use]
    pub fn target(&self) -> Option<&EntityId> {
        self.target.as_ref()
    }

    /// Returns the free-form relation type.
    #[must_use]
    pub fn relation_type(&self) -> &str {
        &self.relation_type
    }

    /// Returns the raw payload.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Returns the payload as `T` if present and of the matching case.
    #[must_use]
    pub fn payload_as<T: FromValue>(&self) -> Option<T> {
        self.payload.as_ref().and_then(T::from_value)
    }

    /// Returns true if a payload is attached, even a falsy one.
    #[must_use]
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Returns true if this relation has no target.
    #[must_use]
    pub fn is_unary(&self) -> bool {
        self.target.is_none()
    }

    /// Returns true if `id` is the source or the target.
    #[must_use]
    pub fn involves(&self, id: &str) -> bool {
        self.source == *id || self.target.as_ref().is_some_and(|t| *t == *id)
    }

    /// The entity the relation's content flows out of (binary relations only).
    #[must_use]
    pub fn flows_from(&self) -> Option<&EntityId> {
        self.target.as_ref().map(|_| &self.source)
    }

    /// The entity the relation's content flows into (binary relations only).
    #[must_use]
    pub fn flows_to(&self) -> Option<&EntityId> {
        self.target.as_ref()
    }

    /// Compares the identifying fields: primitive, source, target and type.
    ///
    /// Payloads are ignored, so two relations that differ only in payload
    /// are the same relation as far as removal is concerned.
    #[must_use]
    pub fn same_identity(&self, other: &Relation) -> bool {
        self.primitive == other.primitive
            && self.source == other.source
            && self.target == other.target
            && self.relation_type == other.relation_type
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}", self.primitive, self.source)?;
        if let Some(target) = &self.target {
            write!(f, " -> {target}")?;
        }
        write!(f, ", {})", self.relation_type)
    }
}
