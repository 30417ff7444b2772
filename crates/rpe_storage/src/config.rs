//! Configuration for world construction.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rpe_foundation::{Error, Result};

use crate::spatial::DEFAULT_CELL_SIZE;

/// Settings fixed at world construction time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Spatial grid cell size in world units.
    pub cell_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl WorldConfig {
    /// Builder method to set the spatial cell size.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Checks that the configuration can build a world.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell size is not positive and finite.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size.is_finite() && self.cell_size > 0.0 {
            Ok(())
        } else {
            Err(Error::invalid_cell_size(self.cell_size))
        }
    }
}
