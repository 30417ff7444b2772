//! World state: the aggregate root of the simulation.
//!
//! The `World` owns every entity, the relation list and its derived indices,
//! the dirty set, the spatial index and the tick counter. All mutation is in
//! place; there is no snapshotting, so a change made by one rule is visible
//! to the very next rule.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use rpe_foundation::{EntityId, Primitive, Result};

use crate::config::WorldConfig;
use crate::entity::Entity;
use crate::relation::Relation;
use crate::spatial::SpatialIndex;

/// Container for all entities and relations.
///
/// Entities live in an ordered arena keyed by id, so iteration (and every
/// built-in sweep that walks the arena) visits them in id order on every run.
#[derive(Clone, Debug, Default)]
pub struct World {
    /// Entity arena.
    entities: BTreeMap<EntityId, Entity>,
    /// Relations in insertion order.
    relations: Vec<Relation>,
    /// Derived: entity id to positions in `relations` (source or target).
    by_entity: HashMap<EntityId, Vec<usize>>,
    /// Derived: primitive to positions in `relations`.
    by_primitive: HashMap<Primitive, Vec<usize>>,
    /// Ids changed since the last clear.
    dirty: BTreeSet<EntityId>,
    /// Proximity index, synced during GEOMETRY.
    spatial: SpatialIndex,
    /// Completed ticks.
    tick: u64,
}

impl World {
    /// Creates an empty world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty world from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            spatial: SpatialIndex::with_cell_size(config.cell_size)?,
            ..Self::default()
        })
    }

    // --- Entity Operations ---

    /// Inserts a new entity and returns a handle to it.
    ///
    /// An existing entity with the same id is replaced (last write wins) and
    /// its spatial entry is dropped, since the replacement has no position
    /// until its coordinates are set and synced. The new entity is marked
    /// dirty.
    pub fn create_entity(&mut self, id: impl Into<EntityId>, kind: impl Into<String>) -> &mut Entity {
        let id = id.into();
        let mut entity = Entity::new(id.clone(), kind);
        entity.mark_dirty();
        self.dirty.insert(id.clone());

        match self.entities.entry(id) {
            Entry::Occupied(mut slot) => {
                self.spatial.remove_entity(slot.key().as_str());
                slot.insert(entity);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(entity),
        }
    }

    /// Looks up an entity.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Looks up an entity for mutation.
    pub fn entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Returns true if an entity with this id exists.
    #[must_use]
    pub fn contains_entity(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Removes an entity.
    ///
    /// Also purges it from the spatial index, the dirty set and the
    /// entity-to-relation index. Relations naming it are kept. Returns true
    /// if an entity was present.
    pub fn remove_entity(&mut self, id: &str) -> bool {
        self.spatial.remove_entity(id);
        self.dirty.remove(id);
        self.by_entity.remove(id);
        self.entities.remove(id).is_some()
    }

    /// Iterates over entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Iterates mutably over entities in id order.
    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Returns a snapshot of all entity ids in id order.
    ///
    /// Useful for rules that need to mutate the world while walking it.
    #[must_use]
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().cloned().collect()
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // --- Relation Operations ---

    /// Appends a relation and rebuilds the relation indices.
    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
        self.rebuild_relation_indices();
    }

    /// Removes every relation with the same identity as `relation`.
    ///
    /// Identity is primitive, source, target and type; payloads are ignored.
    /// Returns the number of relations removed (zero is a silent no-op).
    pub fn remove_relation(&mut self, relation: &Relation) -> usize {
        let before = self.relations.len();
        self.relations.retain(|r| !r.same_identity(relation));
        self.rebuild_relation_indices();
        before - self.relations.len()
    }

    /// Returns every relation in insertion order.
    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Returns the number of relations.
    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Returns relations whose source or target is `id`, in insertion order.
    #[must_use]
    pub fn relations_for_entity(&self, id: &str) -> Vec<&Relation> {
        self.by_entity
            .get(id)
            .map(|indices| indices.iter().map(|&i| &self.relations[i]).collect())
            .unwrap_or_default()
    }

    /// Returns relations tagged with `primitive`, in insertion order.
    #[must_use]
    pub fn relations_by_primitive(&self, primitive: Primitive) -> Vec<&Relation> {
        self.by_primitive
            .get(&primitive)
            .map(|indices| indices.iter().map(|&i| &self.relations[i]).collect())
            .unwrap_or_default()
    }

    fn rebuild_relation_indices(&mut self) {
        self.by_entity.clear();
        self.by_primitive.clear();

        for (i, relation) in self.relations.iter().enumerate() {
            self.by_entity
                .entry(relation.source().clone())
                .or_default()
                .push(i);

            if let Some(target) = relation.target() {
                if target != relation.source() {
                    self.by_entity.entry(target.clone()).or_default().push(i);
                }
            }

            self.by_primitive
                .entry(relation.primitive())
                .or_default()
                .push(i);
        }
    }

    // --- Dirty Tracking ---

    /// Records `id` as changed this tick and flags the entity if it exists.
    ///
    /// Unknown ids are still added to the dirty set.
    pub fn mark_entity_dirty(&mut self, id: &str) {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.mark_dirty();
                self.dirty.insert(entity.id().clone());
            }
            None => {
                self.dirty.insert(EntityId::from(id));
            }
        }
    }

    /// Returns the ids changed since the last clear.
    #[must_use]
    pub fn dirty_entities(&self) -> &BTreeSet<EntityId> {
        &self.dirty
    }

    /// Empties the dirty set and clears every entity's flag.
    pub fn clear_dirty_flags(&mut self) {
        self.dirty.clear();
        for entity in self.entities.values_mut() {
            entity.clear_dirty();
        }
    }

    // --- Spatial Index ---

    /// Returns the spatial index.
    #[must_use]
    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.spatial
    }

    /// Returns the spatial index for direct updates.
    pub fn spatial_index_mut(&mut self) -> &mut SpatialIndex {
        &mut self.spatial
    }

    // --- Tick Counter ---

    /// Returns the number of completed ticks.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick counter by one.
    pub fn increment_tick(&mut self) {
        self.tick += 1;
    }
}
