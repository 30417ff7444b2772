//! Configuration for the engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::trace::DEFAULT_TRACE_CAPACITY;

/// Engine settings.
///
/// Verbosity only controls diagnostics; it never changes tick semantics.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Emit log events and record a trace.
    pub verbose: bool,

    /// Maximum records kept in the trace buffer.
    pub trace_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            trace_capacity: DEFAULT_TRACE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with verbose diagnostics enabled.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Self::default()
        }
    }

    /// Builder method to set verbosity.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Builder method to set the trace buffer capacity.
    #[must_use]
    pub fn with_trace_capacity(mut self, capacity: usize) -> Self {
        self.trace_capacity = capacity;
        self
    }
}
