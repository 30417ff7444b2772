//! Integration tests for World lifecycle and dirty tracking

use rpe_foundation::{Primitive, Vec2};
use rpe_storage::{Relation, World, WorldConfig};

#[test]
fn world_starts_empty() {
    let world = World::new();
    assert_eq!(world.entity_count(), 0);
    assert_eq!(world.relation_count(), 0);
    assert_eq!(world.current_tick(), 0);
    assert!(world.dirty_entities().is_empty());
    assert!(world.spatial_index().is_empty());
}

#[test]
fn created_entities_are_dirty_until_cleared() {
    let mut world = World::new();
    world.create_entity("a", "agent");
    world.create_entity("b", "agent");
    assert_eq!(world.dirty_entities().len(), 2);

    world.clear_dirty_flags();
    assert!(world.dirty_entities().is_empty());

    world.mark_entity_dirty("b");
    assert!(world.entity("b").unwrap().is_dirty());
    assert!(!world.entity("a").unwrap().is_dirty());
}

#[test]
fn removal_cascades_but_keeps_relations() {
    let mut world = World::new();
    world.create_entity("deer", "consumer");
    world.spatial_index_mut().update_position("deer", Vec2::new(1.0, 1.0));
    world.add_relation(Relation::binary(Primitive::Dynamics, "grass", "deer", "influence"));

    assert!(world.remove_entity("deer"));
    assert!(world.entity("deer").is_none());
    assert!(!world.spatial_index().contains("deer"));
    assert!(!world.dirty_entities().contains("deer"));
    assert!(world.relations_for_entity("deer").is_empty());
    assert_eq!(world.relations_for_entity("grass").len(), 1);
}

#[test]
fn removing_missing_entity_is_noop() {
    let mut world = World::new();
    assert!(!world.remove_entity("ghost"));
}

#[test]
fn configured_cell_size() {
    let world = World::with_config(&WorldConfig::default().with_cell_size(10.0)).unwrap();
    assert_eq!(world.spatial_index().cell_size(), 10.0);
}

#[test]
fn entity_ids_snapshot_allows_mutation() {
    let mut world = World::new();
    for id in ["c", "a", "b"] {
        world.create_entity(id, "agent");
    }
    for id in world.entity_ids() {
        if id.as_str() != "b" {
            world.remove_entity(id.as_str());
        }
    }
    assert_eq!(world.entity_count(), 1);
    assert!(world.contains_entity("b"));
}
