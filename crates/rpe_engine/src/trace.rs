//! Diagnostic trace of tick execution.
//!
//! When the engine runs verbose it records what happened into a bounded
//! ring buffer, oldest records evicted first. The trace is advisory: it is
//! never read back by the engine and never changes what a tick does.

use std::collections::VecDeque;
use std::fmt;

use rpe_foundation::EntityId;

use crate::phase::Phase;

// =============================================================================
// Trace Event
// =============================================================================

/// Something the engine did during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceEvent {
    /// A tick has started.
    TickStart,

    /// A phase has started.
    PhaseStart {
        /// The phase that started.
        phase: Phase,
    },

    /// A registered rule has been invoked.
    RuleRun {
        /// Phase the rule belongs to.
        phase: Phase,
        /// Rule display name.
        rule: String,
    },

    /// A built-in clamp changed a value.
    Clamped {
        /// The clamped entity.
        entity: EntityId,
        /// The clamped property.
        key: String,
        /// Value before the clamp.
        from: f64,
        /// Value after the clamp.
        to: f64,
    },

    /// The death sweep removed an entity.
    EntityRemoved {
        /// The removed entity.
        entity: EntityId,
    },

    /// A tick has ended.
    TickEnd {
        /// False if a rule failure aborted the tick.
        success: bool,
    },
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TickStart => "tick_start",
            Self::PhaseStart { .. } => "phase_start",
            Self::RuleRun { .. } => "rule_run",
            Self::Clamped { .. } => "clamped",
            Self::EntityRemoved { .. } => "entity_removed",
            Self::TickEnd { .. } => "tick_end",
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TickStart => write!(f, "tick start"),
            Self::PhaseStart { phase } => write!(f, "phase {phase}"),
            Self::RuleRun { phase, rule } => write!(f, "rule {rule} ({phase})"),
            Self::Clamped { entity, key, from, to } => {
                write!(f, "clamp {entity}.{key}: {from} -> {to}")
            }
            Self::EntityRemoved { entity } => write!(f, "removed {entity}"),
            Self::TickEnd { success: true } => write!(f, "tick end"),
            Self::TickEnd { success: false } => write!(f, "tick aborted"),
        }
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A trace event stamped with a sequence number and the tick it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceRecord {
    /// Monotonic record id, never reused.
    pub id: u64,
    /// Zero-based index of the tick that produced the event.
    pub tick: u64,
    /// What happened.
    pub event: TraceEvent,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}#{}] {}", self.tick, self.id, self.event)
    }
}

// =============================================================================
// Trace Buffer
// =============================================================================

/// Fixed-capacity ring of trace records.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    records: VecDeque<TraceRecord>,
    capacity: usize,
    next_id: u64,
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_CAPACITY)
    }
}

/// Records kept when no capacity is configured.
pub const DEFAULT_TRACE_CAPACITY: usize = 10_000;

impl TraceBuffer {
    /// Creates a buffer holding at most `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_id: 0,
        }
    }

    /// Appends an event, evicting the oldest records when full.
    ///
    /// Returns the assigned record id. A zero-capacity buffer assigns ids
    /// but keeps nothing.
    pub fn push(&mut self, tick: u64, event: TraceEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.records.push_back(TraceRecord { id, tick, event });
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
        id
    }

    /// Returns the maximum number of records kept.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record. Ids keep increasing.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Iterates over records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Returns the records produced by one tick.
    #[must_use]
    pub fn records_for_tick(&self, tick: u64) -> Vec<&TraceRecord> {
        self.records.iter().filter(|r| r.tick == tick).collect()
    }

    /// Returns the most recent `count` records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let start = self.records.len().saturating_sub(count);
        self.records.iter().skip(start).collect()
    }

    /// Returns records whose event has the given type name.
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.records
            .iter()
            .filter(|r| r.event.event_type() == event_type)
            .collect()
    }

    /// Returns the oldest tick still represented.
    #[must_use]
    pub fn oldest_tick(&self) -> Option<u64> {
        self.records.front().map(|r| r.tick)
    }

    /// Returns the newest tick represented.
    #[must_use]
    pub fn newest_tick(&self) -> Option<u64> {
        self.records.back().map(|r| r.tick)
    }
}
