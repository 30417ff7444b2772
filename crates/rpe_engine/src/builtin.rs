//! Built-in passes run at the end of GEOMETRY, CONSTRAINT and META.
//!
//! Built-ins read numbers through any numeric case and write back in the
//! case they found, so an integer `health` stays an integer after a clamp.
//! Bounds are rounded inward for that case, so an integer clamped against a
//! fractional maximum lands on the integer below it.
//! Properties holding a non-numeric value are skipped.

use rpe_foundation::{EntityId, Vec2};
use rpe_storage::World;

/// Property names the built-ins read.
pub mod keys {
    /// Horizontal position.
    pub const X: &str = "x";
    /// Vertical position.
    pub const Y: &str = "y";
    /// Current health; an entity at or below zero is removed in META.
    pub const HEALTH: &str = "health";
    /// Upper bound for `health`.
    pub const MAX_HEALTH: &str = "max_health";
    /// Current energy.
    pub const ENERGY: &str = "energy";
    /// Upper bound for `energy`.
    pub const MAX_ENERGY: &str = "max_energy";
}

/// Health bound used when `max_health` is absent.
pub const DEFAULT_MAX_HEALTH: f64 = 100.0;

/// Energy bound used when `max_energy` is absent.
pub const DEFAULT_MAX_ENERGY: f64 = 100.0;

const VITALS: [(&str, &str, f64); 2] = [
    (keys::HEALTH, keys::MAX_HEALTH, DEFAULT_MAX_HEALTH),
    (keys::ENERGY, keys::MAX_ENERGY, DEFAULT_MAX_ENERGY),
];

/// A value changed by [`clamp_vitals`].
#[derive(Clone, Debug, PartialEq)]
pub struct Clamp {
    /// The clamped entity.
    pub entity: EntityId,
    /// The clamped property.
    pub key: &'static str,
    /// Value before the clamp.
    pub from: f64,
    /// Value after the clamp.
    pub to: f64,
}

/// Pushes every numeric `x`/`y` pair into the spatial index.
///
/// Entities lacking either coordinate are left untouched, including any
/// position the index already holds for them. Returns the number synced.
#[allow(clippy::cast_possible_truncation)]
pub fn sync_spatial_index(world: &mut World) -> usize {
    let positions: Vec<(EntityId, Vec2)> = world
        .entities()
        .filter_map(|e| {
            let x = e.number(keys::X)?;
            let y = e.number(keys::Y)?;
            Some((e.id().clone(), Vec2::new(x as f32, y as f32)))
        })
        .collect();

    let synced = positions.len();
    let index = world.spatial_index_mut();
    for (id, position) in positions {
        index.update_position(id, position);
    }
    synced
}

/// Clamps `health` and `energy` into `[0, max]`.
///
/// The maximum comes from `max_health` / `max_energy` when numeric and
/// defaults to 100. A negative maximum clamps to zero. NaN values are left
/// alone. Every entity whose value actually changed is marked dirty.
pub fn clamp_vitals(world: &mut World) -> Vec<Clamp> {
    let mut clamps = Vec::new();

    for entity in world.entities_mut() {
        for (key, max_key, default_max) in VITALS {
            let Some(value) = entity.state(key) else {
                continue;
            };
            let Some(current) = value.as_number() else {
                continue;
            };
            if current.is_nan() {
                continue;
            }

            let max = entity.number(max_key).unwrap_or(default_max);
            let Some(replacement) = value.clamp_number(0.0, max) else {
                continue;
            };
            if replacement == *value {
                continue;
            }

            let to = replacement.as_number().unwrap_or(0.0);
            entity.set_state(key, replacement);
            clamps.push(Clamp {
                entity: entity.id().clone(),
                key,
                from: current,
                to,
            });
        }
    }

    for clamp in &clamps {
        world.mark_entity_dirty(clamp.entity.as_str());
    }
    clamps
}

/// Removes every entity whose numeric `health` is at or below zero.
///
/// Entities are removed in id order through [`World::remove_entity`], so
/// the spatial index and dirty set forget them too. Returns the removed ids.
pub fn sweep_dead(world: &mut World) -> Vec<EntityId> {
    let dead: Vec<EntityId> = world
        .entities()
        .filter(|e| e.number(keys::HEALTH).is_some_and(|h| h <= 0.0))
        .map(|e| e.id().clone())
        .collect();

    for id in &dead {
        world.remove_entity(id.as_str());
    }
    dead
}
