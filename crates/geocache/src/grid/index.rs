//! Canonical cell registry.
//!
//! [`GridIndex`] converts geographic points into integer cell coordinates and guarantees that
//! every coordinate pair maps to exactly one [`Cell`]. Cells live in an arena owned by the index;
//! callers receive `Copy` values carrying the canonical [`CellId`].
//!
//! Typical usage:
//! - Resolve a point with [`GridIndex::cell_at`].
//! - Draw a cell with the rectangle from [`GridIndex::bounds_of`].
//! - Enumerate the visible block around a point with [`GridIndex::neighborhood`].
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::warn;

use crate::error::{Error, Result};
use crate::grid::{Cell, CellBounds, CellCoord, CellId, LatLng};

/// Upper bound for the capacity reserved up front by [`GridIndex::neighborhood`].
const MAX_NEIGHBORHOOD_RESERVE: usize = 1 << 16;

/// Source of the per-index tags stamped into every [`CellId`].
static NEXT_GRID_TAG: AtomicU32 = AtomicU32::new(0);

/// Registry owning every canonical [`Cell`] produced for one session.
#[derive(Debug)]
pub struct GridIndex {
    tag: u32,
    tile_width: f64,
    visibility_radius: u32,
    cells: Vec<Cell>,
    lookup: HashMap<CellCoord, CellId>,
}

impl GridIndex {
    /// Creates an index, rejecting non-finite or non-positive tile widths.
    pub fn try_new(tile_width: f64, visibility_radius: u32) -> Result<Self> {
        validate_tile_width(tile_width)?;
        Ok(Self::new(tile_width, visibility_radius))
    }

    pub fn new(tile_width: f64, visibility_radius: u32) -> Self {
        debug_assert!(
            tile_width.is_finite() && tile_width > 0.0,
            "tile_width must be finite and > 0"
        );

        Self {
            tag: NEXT_GRID_TAG.fetch_add(1, Ordering::Relaxed),
            tile_width,
            visibility_radius,
            cells: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Degrees per cell edge.
    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    /// Cells enumerated in each direction by [`GridIndex::neighborhood`].
    pub fn visibility_radius(&self) -> u32 {
        self.visibility_radius
    }

    /// Number of canonical cells created so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Looks up a cell by handle. Returns `None` for handles issued by another index.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        if !self.owns(id) {
            return None;
        }
        self.cells.get(id.index())
    }

    /// Whether `id` was issued by this index.
    pub fn owns(&self, id: CellId) -> bool {
        id.grid == self.tag
    }

    /// Looks up the canonical cell for `coord` without creating it.
    pub fn get(&self, coord: CellCoord) -> Option<Cell> {
        self.lookup.get(&coord).map(|id| self.cells[id.index()])
    }

    /// Iterates over all canonical cells in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Returns the canonical cell for `coord`, creating it on first use.
    pub fn cell_for(&mut self, coord: CellCoord) -> Cell {
        if let Some(id) = self.lookup.get(&coord) {
            return self.cells[id.index()];
        }

        debug_assert!(self.cells.len() < u32::MAX as usize, "cell arena exhausted");
        let cell = Cell::new(CellId::new(self.tag, self.cells.len() as u32), coord);
        self.cells.push(cell);
        self.lookup.insert(coord, cell.id());
        cell
    }

    /// Computes the grid coordinates containing `point` without touching the registry.
    pub fn coord_at(&self, point: LatLng) -> Result<CellCoord> {
        if !point.is_finite() {
            warn!("Rejecting non-finite coordinate ({}, {}).", point.lat, point.lng);
            return Err(Error::InvalidCoordinate {
                lat: point.lat,
                lng: point.lng,
            });
        }

        Ok(CellCoord::new(
            axis_index(point.lat, self.tile_width, "latitude")?,
            axis_index(point.lng, self.tile_width, "longitude")?,
        ))
    }

    /// Returns the canonical cell containing `point`.
    pub fn cell_at(&mut self, point: LatLng) -> Result<Cell> {
        let coord = self.coord_at(point)?;
        Ok(self.cell_for(coord))
    }

    /// Geographic rectangle covered by `cell`.
    pub fn bounds_of(&self, cell: &Cell) -> CellBounds {
        self.bounds_of_coord(cell.coord())
    }

    pub fn bounds_of_coord(&self, coord: CellCoord) -> CellBounds {
        let tw = self.tile_width;
        let lat = coord.lat as f64;
        let lng = coord.lng as f64;
        CellBounds::new(
            LatLng::new(lat * tw, lng * tw),
            LatLng::new((lat + 1.0) * tw, (lng + 1.0) * tw),
        )
    }

    /// Canonical cells of the `2r x 2r` block around `point`, where `r` is the visibility radius.
    ///
    /// Offsets run over the half-open range `[-r, r)` on both axes, so the block extends one
    /// cell further south and west of the origin than north and east. Cells are ordered by
    /// latitude offset, then longitude offset, both ascending.
    pub fn neighborhood(&mut self, point: LatLng) -> Result<Vec<Cell>> {
        let origin = self.coord_at(point)?;
        self.neighborhood_of(origin)
    }

    /// Same as [`GridIndex::neighborhood`] for an explicit origin coordinate.
    pub fn neighborhood_of(&mut self, origin: CellCoord) -> Result<Vec<Cell>> {
        let coords = neighborhood_coords(origin, self.visibility_radius)?;
        Ok(coords.into_iter().map(|c| self.cell_for(c)).collect())
    }
}

pub(crate) fn validate_tile_width(tile_width: f64) -> Result<()> {
    if !tile_width.is_finite() || tile_width <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "tile_width must be finite and > 0, got {tile_width}"
        )));
    }
    Ok(())
}

/// Coordinates of the neighborhood block in enumeration order, checked for overflow up front
/// so the registry is not touched when the block cannot be represented.
fn neighborhood_coords(origin: CellCoord, radius: u32) -> Result<Vec<CellCoord>> {
    let r = i32::try_from(radius)
        .map_err(|_| Error::OutOfRange(format!("visibility radius {radius} exceeds i32")))?;

    let side = 2 * radius as usize;
    let mut out = Vec::with_capacity(side.saturating_mul(side).min(MAX_NEIGHBORHOOD_RESERVE));
    for di in -r..r {
        for dj in -r..r {
            let coord = origin.checked_offset(di, dj).ok_or_else(|| {
                Error::OutOfRange(format!("offset ({di}, {dj}) from cell {origin} overflows"))
            })?;
            out.push(coord);
        }
    }
    Ok(out)
}

/// Floor of `value / tile_width` as an `i32`.
///
/// Points with equal floor quotients always share an index. Near grid lines the bounds products
/// `i * tile_width` may round past `value` by one ulp.
fn axis_index(value: f64, tile_width: f64, axis: &str) -> Result<i32> {
    let i = (value / tile_width).floor();
    if !(i32::MIN as f64..=i32::MAX as f64).contains(&i) {
        return Err(Error::OutOfRange(format!(
            "{axis} {value} with tile width {tile_width}"
        )));
    }
    Ok(i as i32)
}
