//! Grid subsystem mapping geographic coordinates onto canonical cell identities.
//!
//! This module groups the coordinate and identity types used throughout the crate and
//! the [`GridIndex`] registry that owns every [`Cell`] it hands out.
use std::fmt;

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod bounds;
pub mod index;

pub use bounds::CellBounds;
pub use index::GridIndex;

/// A geographic point in degrees.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` if both components are finite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// `x` carries latitude, `y` carries longitude.
impl From<DVec2> for LatLng {
    fn from(v: DVec2) -> Self {
        Self { lat: v.x, lng: v.y }
    }
}

impl From<LatLng> for DVec2 {
    fn from(p: LatLng) -> Self {
        DVec2::new(p.lat, p.lng)
    }
}

impl From<mint::Vector2<f64>> for LatLng {
    fn from(v: mint::Vector2<f64>) -> Self {
        Self { lat: v.x, lng: v.y }
    }
}

impl From<LatLng> for mint::Vector2<f64> {
    fn from(p: LatLng) -> Self {
        mint::Vector2 { x: p.lat, y: p.lng }
    }
}

/// Integer grid coordinates of a cell, in multiples of the tile width.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    /// Cell index along the latitude axis.
    pub lat: i32,
    /// Cell index along the longitude axis.
    pub lng: i32,
}

impl CellCoord {
    pub const fn new(lat: i32, lng: i32) -> Self {
        Self { lat, lng }
    }

    /// Offsets this coordinate, returning `None` on `i32` overflow.
    pub fn checked_offset(self, dlat: i32, dlng: i32) -> Option<Self> {
        Some(Self {
            lat: self.lat.checked_add(dlat)?,
            lng: self.lng.checked_add(dlng)?,
        })
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lat, self.lng)
    }
}

/// Handle of a canonical cell inside the [`GridIndex`] that issued it.
///
/// The handle carries the issuing index's tag, so it never resolves in another index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId {
    pub(crate) grid: u32,
    pub(crate) slot: u32,
}

impl CellId {
    pub(crate) fn new(grid: u32, slot: u32) -> Self {
        Self { grid, slot }
    }

    /// Arena slot of this cell.
    pub fn index(self) -> usize {
        self.slot as usize
    }
}

/// Canonical identity of one grid square.
///
/// Cells are only created by [`GridIndex`]. Two cells obtained from the same index with equal
/// coordinates always carry the same [`CellId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    id: CellId,
    coord: CellCoord,
}

impl Cell {
    pub(crate) fn new(id: CellId, coord: CellCoord) -> Self {
        Self { id, coord }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    pub fn lat_index(&self) -> i32 {
        self.coord.lat
    }

    pub fn lng_index(&self) -> i32 {
        self.coord.lng
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.coord.fmt(f)
    }
}
