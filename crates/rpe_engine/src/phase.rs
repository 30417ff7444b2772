//! Tick phases.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rpe_foundation::{Error, Primitive};

/// One of the six stages every tick passes through, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Phase {
    /// Spatial updates; ends with the position sync.
    Geometry,
    /// Invariant enforcement; ends with the vital clamps.
    Constraint,
    /// Knowledge and perception.
    Epistemic,
    /// State change over time.
    Dynamics,
    /// Lifecycle; ends with the death sweep.
    Meta,
    /// Global consistency passes.
    Gco,
}

impl Phase {
    /// Every phase in execution order.
    pub const ALL: [Phase; 6] = [
        Phase::Geometry,
        Phase::Constraint,
        Phase::Epistemic,
        Phase::Dynamics,
        Phase::Meta,
        Phase::Gco,
    ];

    /// Returns the upper-case phase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Geometry => "GEOMETRY",
            Self::Constraint => "CONSTRAINT",
            Self::Epistemic => "EPISTEMIC",
            Self::Dynamics => "DYNAMICS",
            Self::Meta => "META",
            Self::Gco => "GCO",
        }
    }

    /// Position in execution order.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The relational primitive this phase is named after, if any.
    #[must_use]
    pub fn primitive(self) -> Option<Primitive> {
        match self {
            Self::Geometry => Some(Primitive::Geometry),
            Self::Constraint => Some(Primitive::Constraint),
            Self::Epistemic => Some(Primitive::Epistemic),
            Self::Dynamics => Some(Primitive::Dynamics),
            Self::Meta => Some(Primitive::Meta),
            Self::Gco => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::unknown_phase(s))
    }
}
