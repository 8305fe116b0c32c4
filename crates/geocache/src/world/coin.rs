//! Coin tokens and the containers that hold them.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{Cell, CellCoord};

/// A token minted at a cell, identified by its origin and serial.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coin {
    /// Cell where the coin was minted.
    pub origin: CellCoord,
    /// Serial unique among coins minted at `origin`.
    pub serial: u32,
}

impl Coin {
    pub const fn new(origin: CellCoord, serial: u32) -> Self {
        Self { origin, serial }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.origin, self.serial)
    }
}

/// Coins stored at one cell. The last coin pushed is the first removed.
///
/// Only the owning [`crate::world::CacheWorld`] can move coins in or out; a clone is an inert
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    cell: Cell,
    pub(crate) coins: Vec<Coin>,
}

impl Cache {
    /// Creates a cache at `cell` holding `count` coins minted there, serials ascending.
    pub(crate) fn minted(cell: Cell, count: u32) -> Self {
        let origin = cell.coord();
        Self {
            cell,
            coins: (0..count).map(|serial| Coin::new(origin, serial)).collect(),
        }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Coins in insertion order; the last element is the next one collected.
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Coin that [`crate::world::CacheWorld::collect_at`] would move next.
    pub fn top(&self) -> Option<&Coin> {
        self.coins.last()
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}

/// The player's coin holding. Same stack discipline as [`Cache`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub(crate) coins: Vec<Coin>,
}

impl Inventory {
    pub fn new() -> Self {
        Self { coins: Vec::new() }
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Coin that [`crate::world::CacheWorld::deposit_at`] would move next.
    pub fn top(&self) -> Option<&Coin> {
        self.coins.last()
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridIndex;

    #[test]
    fn coin_display_names_origin_and_serial() {
        let coin = Coin::new(CellCoord::new(369894, -1220628), 12);
        assert_eq!(coin.to_string(), "369894:-1220628#12");
    }

    #[test]
    fn minted_cache_holds_ascending_serials() {
        let mut grid = GridIndex::new(1.0, 1);
        let cell = grid.cell_for(CellCoord::new(4, -2));
        let cache = Cache::minted(cell, 3);

        assert_eq!(cache.cell(), cell);
        assert_eq!(cache.len(), 3);
        assert_eq!(
            cache.coins(),
            &[
                Coin::new(CellCoord::new(4, -2), 0),
                Coin::new(CellCoord::new(4, -2), 1),
                Coin::new(CellCoord::new(4, -2), 2),
            ]
        );
        assert_eq!(cache.top(), Some(&Coin::new(CellCoord::new(4, -2), 2)));
    }

    #[test]
    fn empty_containers_have_no_top() {
        let mut grid = GridIndex::new(1.0, 1);
        let cache = Cache::minted(grid.cell_for(CellCoord::new(0, 0)), 0);
        assert!(cache.is_empty());
        assert!(cache.top().is_none());

        let inventory = Inventory::new();
        assert!(inventory.is_empty());
        assert_eq!(inventory.len(), 0);
        assert!(inventory.top().is_none());
    }
}
