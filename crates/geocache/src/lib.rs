#![forbid(unsafe_code)]
//! geocache: grid cell canonicalization and deterministic coin caches for location-based games.
//!
//! Modules:
//! - grid: canonical cell identities, cell bounds, and neighborhood enumeration
//! - luck: the pure, key-driven unit-interval generator used for spawning
//! - world: caches, coins, the player's inventory, transfers, and events
//!
//! For examples and docs, see README and docs.rs.
pub mod error;
pub mod grid;
pub mod luck;
pub mod world;

/// Convenient re-exports for common types. Import with `use geocache::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grid::{Cell, CellBounds, CellCoord, CellId, GridIndex, LatLng};
    pub use crate::luck::{cell_key, HashLuck, LuckSource, INITIAL_VALUE_KEY};
    pub use crate::world::config::{WorldConfig, OAKES_CLASSROOM};
    pub use crate::world::events::{
        EventSink, FnSink, MultiSink, TransferDirection, VecSink, WorldEvent, WorldEventKind,
    };
    pub use crate::world::{Cache, CacheWorld, Coin, GenerateSummary, Inventory};
}
