//! Spatial partitioning for proximity queries.
//!
//! A uniform grid spatial hash: the plane is cut into square cells of a fixed
//! size and each cell lists the entities whose point lies inside it. Radius
//! and box queries only visit the cells that can contain a hit and then
//! filter by exact geometry, so results are exact rather than conservative.
//!
//! Choose the cell size close to the typical query radius. Much smaller cells
//! turn each query into a large block scan; much larger cells put most of the
//! world into a handful of buckets.

use std::cmp::Ordering;
use std::collections::HashMap;

use rpe_foundation::{Aabb, EntityId, Error, Result, Vec2};

/// Default cell edge length in world units.
pub const DEFAULT_CELL_SIZE: f32 = 50.0;

/// Integer grid coordinates of a cell.
pub type Cell = (i32, i32);

/// Grid-based spatial hash of entity points.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    /// Cell size in world units.
    cell_size: f32,
    /// Last recorded point per entity.
    positions: HashMap<EntityId, Vec2>,
    /// Cell to the entities currently inside it, in insertion order.
    cells: HashMap<Cell, Vec<EntityId>>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            positions: HashMap::new(),
            cells: HashMap::new(),
        }
    }
}

impl SpatialIndex {
    /// Creates an empty index with the default cell size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with the given cell size.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidCellSize`](rpe_foundation::ErrorKind::InvalidCellSize)
    /// if `cell_size` is not positive and finite.
    pub fn with_cell_size(cell_size: f32) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::invalid_cell_size(cell_size));
        }
        Ok(Self {
            cell_size,
            ..Self::default()
        })
    }

    /// Returns the cell size.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Converts a world point to cell coordinates.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_of(&self, position: Vec2) -> Cell {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    // --- Updates ---

    /// Records or relocates an entity's point.
    pub fn update_position(&mut self, id: impl Into<EntityId>, position: Vec2) {
        let id = id.into();
        let cell = self.cell_of(position);

        if let Some(old) = self.positions.insert(id.clone(), position) {
            let old_cell = self.cell_of(old);
            if old_cell == cell {
                return;
            }
            self.detach(id.as_str(), old_cell);
        }

        self.cells.entry(cell).or_default().push(id);
    }

    /// Forgets an entity. No-op if it was never indexed.
    pub fn remove_entity(&mut self, id: &str) {
        if let Some(old) = self.positions.remove(id) {
            let cell = self.cell_of(old);
            self.detach(id, cell);
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.cells.clear();
    }

    fn detach(&mut self, id: &str, cell: Cell) {
        if let Some(entries) = self.cells.get_mut(&cell) {
            entries.retain(|e| e.as_str() != id);
            if entries.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    // --- Lookups ---

    /// Returns the last recorded point for `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.positions.get(id).copied()
    }

    /// Returns true if `id` has a recorded point.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Returns the number of indexed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the number of entities in a cell.
    #[must_use]
    pub fn cell_population(&self, cell: Cell) -> usize {
        self.cells.get(&cell).map_or(0, Vec::len)
    }

    /// Iterates over all indexed points, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, Vec2)> {
        self.positions.iter().map(|(id, pos)| (id, *pos))
    }

    // --- Queries ---

    /// Returns every entity within `radius` of `center` (inclusive).
    ///
    /// Visits the cells covering the circle's bounding box, widened by one
    /// cell on every side, and keeps points whose squared distance is at most
    /// `radius²`. The extra ring catches points whose rounded distance is
    /// exactly `radius` but whose cell lies past the rounded box edge. A
    /// negative or NaN radius matches nothing.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        if !(radius >= 0.0) || self.is_empty() {
            return Vec::new();
        }
        let radius_sq = radius * radius;
        let hit = |pos: Vec2| pos.distance_squared_to(center) <= radius_sq;

        let reach = Vec2::new(radius, radius);
        let lo = self.cell_of(center - reach);
        let hi = self.cell_of(center + reach);
        let lo = (i64::from(lo.0) - 1, i64::from(lo.1) - 1);
        let hi = (i64::from(hi.0) + 1, i64::from(hi.1) + 1);

        let block = Self::block_size(
            (lo.0 as f64, lo.1 as f64),
            (hi.0 as f64, hi.1 as f64),
        );
        if block > self.len() as f64 {
            return self.scan(hit);
        }
        self.gather(lo, hi, hit)
    }

    /// Returns every entity whose point lies inside `bounds` (inclusive).
    ///
    /// An inverted box (`min > max` on either axis) matches nothing.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn query_aabb(&self, bounds: &Aabb) -> Vec<EntityId> {
        if !bounds.is_valid() || self.is_empty() {
            return Vec::new();
        }
        let hit = |pos: Vec2| bounds.contains(pos);

        let lo = self.cell_of(bounds.min);
        let hi = self.cell_of(bounds.max);
        let lo_f = (f64::from(lo.0), f64::from(lo.1));
        let hi_f = (f64::from(hi.0), f64::from(hi.1));

        if Self::block_size(lo_f, hi_f) > self.len() as f64 {
            return self.scan(hit);
        }
        self.gather(
            (i64::from(lo.0), i64::from(lo.1)),
            (i64::from(hi.0), i64::from(hi.1)),
            hit,
        )
    }

    /// Returns up to `k` entities ordered by ascending distance to `point`.
    ///
    /// Equal distances are ordered by entity id. This query ignores the grid
    /// and costs O(n) in the number of indexed entities, so it suits
    /// occasional lookups rather than per-entity, per-tick use.
    #[must_use]
    pub fn query_nearest(&self, point: Vec2, k: usize) -> Vec<EntityId> {
        if k == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<(f32, &EntityId)> = self
            .positions
            .iter()
            .map(|(id, pos)| (pos.distance_squared_to(point), id))
            .collect();

        let by_distance = |a: &(f32, &EntityId), b: &(f32, &EntityId)| -> Ordering {
            a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1))
        };

        if k < candidates.len() {
            candidates.select_nth_unstable_by(k - 1, by_distance);
            candidates.truncate(k);
        }
        candidates.sort_unstable_by(by_distance);

        candidates.into_iter().map(|(_, id)| id.clone()).collect()
    }

    /// Number of cells in the inclusive block `lo..=hi`.
    fn block_size(lo: (f64, f64), hi: (f64, f64)) -> f64 {
        (hi.0 - lo.0 + 1.0) * (hi.1 - lo.1 + 1.0)
    }

    /// Visits the inclusive block of cells `lo..=hi` row by row.
    fn gather(&self, lo: (i64, i64), hi: (i64, i64), hit: impl Fn(Vec2) -> bool) -> Vec<EntityId> {
        let mut results = Vec::new();

        for y in lo.1..=hi.1 {
            let Ok(y) = i32::try_from(y) else { continue };
            for x in lo.0..=hi.0 {
                let Ok(x) = i32::try_from(x) else { continue };
                let Some(entries) = self.cells.get(&(x, y)) else {
                    continue;
                };
                for id in entries {
                    if self.positions.get(id).is_some_and(|pos| hit(*pos)) {
                        results.push(id.clone());
                    }
                }
            }
        }

        results
    }

    /// Linear fallback when the cell block outnumbers the indexed entities.
    ///
    /// Sorted by id so the result does not depend on hash order.
    fn scan(&self, hit: impl Fn(Vec2) -> bool) -> Vec<EntityId> {
        let mut results: Vec<EntityId> = self
            .positions
            .iter()
            .filter(|(_, pos)| hit(**pos))
            .map(|(id, _)| id.clone())
            .collect();
        results.sort_unstable();
        results
    }
}
