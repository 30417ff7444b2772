//! Error types for the RPE system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! The taxonomy is deliberately narrow: absent or mismatched property reads,
//! lookups of missing entities, and relation removals that match nothing are
//! not errors at all. What remains are construction failures and faults
//! raised by host rules during a tick.

use std::fmt;

use thiserror::Error;

/// Error type returned by fallible host rules.
///
/// Rules may fail with any error type; the engine wraps it into
/// [`ErrorKind::RuleFailed`] together with the phase and rule name.
pub type RuleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for RPE operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a rule failure error.
    #[must_use]
    pub fn rule_failed(phase: impl Into<String>, rule: impl Into<String>, source: RuleError) -> Self {
        Self::new(ErrorKind::RuleFailed {
            phase: phase.into(),
            rule: rule.into(),
            source,
        })
    }

    /// Creates an invalid cell size error.
    #[must_use]
    pub fn invalid_cell_size(cell_size: f32) -> Self {
        Self::new(ErrorKind::InvalidCellSize(cell_size))
    }

    /// Creates an unknown primitive error.
    #[must_use]
    pub fn unknown_primitive(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownPrimitive(name.into()))
    }

    /// Creates an unknown phase error.
    #[must_use]
    pub fn unknown_phase(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownPhase(name.into()))
    }

    /// Returns the name of the failing rule, if this is a rule failure.
    #[must_use]
    pub fn failed_rule(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::RuleFailed { rule, .. } => Some(rule),
            _ => None,
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A host rule returned an error, aborting the tick in progress.
    #[error("rule {rule} failed during {phase}: {source}")]
    RuleFailed {
        /// The phase the rule was registered under.
        phase: String,
        /// The display name the rule was registered with.
        rule: String,
        /// The error the rule returned.
        #[source]
        source: RuleError,
    },

    /// Spatial grid cell size must be positive and finite.
    #[error("invalid cell size: {0} (must be positive and finite)")]
    InvalidCellSize(f32),

    /// A relational primitive name could not be parsed.
    #[error("unknown primitive: {0}")]
    UnknownPrimitive(String),

    /// A phase name could not be parsed.
    #[error("unknown phase: {0}")]
    UnknownPhase(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Tick during which the error occurred.
    pub tick: Option<u64>,
    /// Entity being processed, if known.
    pub entity: Option<String>,
    /// Free-form notes, innermost first.
    pub notes: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick.
    #[must_use]
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Sets the entity.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tick) = self.tick {
            write!(f, "at tick {tick}")?;
        }
        if let Some(entity) = &self.entity {
            if self.tick.is_some() {
                write!(f, ", ")?;
            }
            write!(f, "entity {entity}")?;
        }
        for note in &self.notes {
            writeln!(f)?;
            write!(f, "  {note}")?;
        }
        Ok(())
    }
}
