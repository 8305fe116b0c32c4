//! Geographic rectangles covered by grid cells.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::LatLng;

/// Axis-aligned rectangle covered by a cell, half-open on the north and east edges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
    /// Minimum latitude and longitude corner.
    pub south_west: LatLng,
    /// Maximum latitude and longitude corner (exclusive).
    pub north_east: LatLng,
}

impl CellBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Returns `true` if `p` lies in `[south_west, north_east)` component-wise.
    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat < self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng < self.north_east.lng
    }

    /// Midpoint of the rectangle.
    pub fn center(&self) -> LatLng {
        let sw = DVec2::from(self.south_west);
        let ne = DVec2::from(self.north_east);
        LatLng::from((sw + ne) * 0.5)
    }

    /// Extent as `(lat span, lng span)`.
    pub fn size(&self) -> DVec2 {
        DVec2::from(self.north_east) - DVec2::from(self.south_west)
    }
}
