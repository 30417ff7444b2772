//! Entities: identity plus an open-ended typed property bag.
//!
//! An entity performs no validation of its own. Range and validity checks
//! are the job of rules running in the CONSTRAINT phase.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rpe_foundation::{EntityId, FromValue, Value};

/// A discrete world participant.
///
/// Entities are owned by the [`World`](crate::World) and only ever handed
/// out as borrows scoped to the caller.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    /// Unique key, immutable after creation.
    id: EntityId,
    /// Classification tag ("agent", "resource", ...).
    kind: String,
    /// Property name to value.
    state: BTreeMap<String, Value>,
    /// Set when the entity changed during the current tick.
    dirty: bool,
}

impl Entity {
    /// Creates a new entity with no properties.
    #[must_use]
    pub fn new(id: impl Into<EntityId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            state: BTreeMap::new(),
            dirty: false,
        }
    }

    /// Returns the entity's identifier.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns the entity's kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Reclassifies the entity.
    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.kind = kind.into();
    }

    // --- Properties ---

    /// Inserts or overwrites a property, returning the previous value.
    pub fn set_state(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.state.insert(key.into(), value.into())
    }

    /// Typed read with a caller-supplied fallback.
    ///
    /// Returns the stored value only if the key is present and its case
    /// matches `T`; otherwise returns `default`. A mismatch is not an error.
    ///
    /// ```
    /// # use rpe_storage::Entity;
    /// let mut deer = Entity::new("deer", "consumer");
    /// deer.set_state("energy", 40.0_f64);
    ///
    /// assert_eq!(deer.get_state("energy", 0.0_f64), 40.0);
    /// assert_eq!(deer.get_state("energy", 7.0_f32), 7.0); // stored as f64
    /// assert_eq!(deer.get_state("hunger", 0.0_f64), 0.0); // absent
    /// ```
    #[must_use]
    pub fn get_state<T: FromValue>(&self, key: &str, default: T) -> T {
        self.state
            .get(key)
            .and_then(T::from_value)
            .unwrap_or(default)
    }

    /// Returns the raw stored value.
    #[must_use]
    pub fn state(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Reads any numeric case widened to `f64`.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.state.get(key).and_then(Value::as_number)
    }

    /// Returns true if the property is present, whatever its case.
    #[must_use]
    pub fn has_state(&self, key: &str) -> bool {
        self.state.contains_key(key)
    }

    /// Removes a property, returning its value.
    pub fn remove_state(&mut self, key: &str) -> Option<Value> {
        self.state.remove(key)
    }

    /// Iterates over all properties in key order.
    pub fn states(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.state.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.state.len()
    }

    // --- Dirty flag ---

    /// Flags the entity as changed this tick.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clears the change flag.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Returns true if the entity changed since the last clear.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
