//! World configuration.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::index::validate_tile_width;
use crate::grid::LatLng;

/// Location of the Oakes College classroom, the default play area.
pub const OAKES_CLASSROOM: LatLng = LatLng::new(36.98949379578401, -122.06277128548504);

pub const DEFAULT_TILE_WIDTH: f64 = 1e-4;
pub const DEFAULT_VISIBILITY_RADIUS: u32 = 8;
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.1;
pub const DEFAULT_MAX_INITIAL_COINS: u32 = 100;

/// Parameters fixed for the lifetime of a [`crate::world::CacheWorld`].
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// Degrees per cell edge.
    pub tile_width: f64,
    /// Cells enumerated in each direction around the generation center.
    pub visibility_radius: u32,
    /// Probability in `[0, 1]` that a cell holds a cache.
    pub spawn_probability: f64,
    /// Scale of the initial coin draw: a cache receives `floor(luck * max_initial_coins)` coins.
    pub max_initial_coins: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            visibility_radius: DEFAULT_VISIBILITY_RADIUS,
            spawn_probability: DEFAULT_SPAWN_PROBABILITY,
            max_initial_coins: DEFAULT_MAX_INITIAL_COINS,
        }
    }
}

impl WorldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tile width in degrees.
    pub fn with_tile_width(mut self, tile_width: f64) -> Self {
        self.tile_width = tile_width;
        self
    }

    /// Sets the visibility radius in cells.
    pub fn with_visibility_radius(mut self, visibility_radius: u32) -> Self {
        self.visibility_radius = visibility_radius;
        self
    }

    /// Sets the per-cell spawn probability.
    pub fn with_spawn_probability(mut self, spawn_probability: f64) -> Self {
        self.spawn_probability = spawn_probability;
        self
    }

    /// Sets the scale of the initial coin draw.
    pub fn with_max_initial_coins(mut self, max_initial_coins: u32) -> Self {
        self.max_initial_coins = max_initial_coins;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        validate_tile_width(self.tile_width)?;
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(Error::InvalidConfig(format!(
                "spawn_probability must be in [0, 1], got {}",
                self.spawn_probability
            )));
        }
        if i32::try_from(self.visibility_radius).is_err() {
            return Err(Error::InvalidConfig(format!(
                "visibility_radius must fit in i32, got {}",
                self.visibility_radius
            )));
        }

        Ok(())
    }
}
