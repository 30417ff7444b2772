//! The six relational primitives.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Error;

/// Classifies what kind of relationship a relation expresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Primitive {
    /// What entities are: identity, structure, composition.
    Ontology,
    /// Where and when entities exist: spatial, temporal, causal structure.
    Geometry,
    /// Rules that govern: bounds, limits, conservation.
    Constraint,
    /// What can be known: visibility, memory, inference.
    Epistemic,
    /// How entities change: movement, interaction, transformation.
    Dynamics,
    /// Rules about rules: spawning, structural change.
    Meta,
}

impl Primitive {
    /// All primitives in declaration order.
    pub const ALL: [Primitive; 6] = [
        Self::Ontology,
        Self::Geometry,
        Self::Constraint,
        Self::Epistemic,
        Self::Dynamics,
        Self::Meta,
    ];

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ontology => "ONTOLOGY",
            Self::Geometry => "GEOMETRY",
            Self::Constraint => "CONSTRAINT",
            Self::Epistemic => "EPISTEMIC",
            Self::Dynamics => "DYNAMICS",
            Self::Meta => "META",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Primitive {
    type Err = Error;

    /// Parses a primitive name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::unknown_primitive(s))
    }
}
