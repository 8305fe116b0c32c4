//! Cache world: deterministic cache generation and coin transfers for one play session.
//!
//! [`CacheWorld`] owns the [`GridIndex`], every [`Cache`] it spawned, and the player's
//! [`Inventory`]. Coins are only minted by [`CacheWorld::generate`]; afterwards they move
//! between caches and the inventory but are never created or dropped.
use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::grid::{CellCoord, CellId, GridIndex, LatLng};
use crate::luck::{cell_key, HashLuck, LuckSource, INITIAL_VALUE_KEY};

pub mod coin;
pub mod config;
pub mod events;
pub(crate) mod transfer;

pub use coin::{Cache, Coin, Inventory};
pub use config::WorldConfig;

use events::{EventSink, TransferDirection, WorldEvent, WorldEventKind};

/// Counts reported by one generation pass.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Cells in the neighborhood that were examined.
    pub cells_visited: usize,
    /// Caches created by this pass.
    pub caches_spawned: usize,
    /// Spawning cells that already held a cache.
    pub caches_existing: usize,
    /// Coins minted by this pass.
    pub coins_minted: u64,
}

/// One play session: the grid, the caches spawned on it, and the player's inventory.
pub struct CacheWorld<L: LuckSource = HashLuck> {
    config: WorldConfig,
    grid: GridIndex,
    luck: L,
    caches: Vec<Cache>,
    by_cell: HashMap<CellId, usize>,
    inventory: Inventory,
    minted: u64,
}

impl CacheWorld<HashLuck> {
    /// Creates an empty world using the default [`HashLuck`] generator.
    pub fn new(config: WorldConfig) -> Result<Self> {
        Self::with_luck(config, HashLuck::new())
    }
}

impl<L: LuckSource> CacheWorld<L> {
    /// Creates an empty world drawing spawn decisions from `luck`.
    pub fn with_luck(config: WorldConfig, luck: L) -> Result<Self> {
        config.validate()?;
        let grid = GridIndex::new(config.tile_width, config.visibility_radius);
        Ok(Self {
            config,
            grid,
            luck,
            caches: Vec::new(),
            by_cell: HashMap::new(),
            inventory: Inventory::new(),
            minted: 0,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    /// Mutable access to the grid. The registry only ever grows, so canonical cells stay valid.
    pub fn grid_mut(&mut self) -> &mut GridIndex {
        &mut self.grid
    }

    pub fn luck(&self) -> &L {
        &self.luck
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// All caches in the order they were spawned.
    pub fn caches(&self) -> &[Cache] {
        &self.caches
    }

    pub fn cache(&self, cell: CellId) -> Option<&Cache> {
        self.by_cell.get(&cell).map(|&slot| &self.caches[slot])
    }

    /// Cache of the cell containing `point`, if that cell has one.
    pub fn cache_at(&self, point: LatLng) -> Result<Option<&Cache>> {
        let coord = self.grid.coord_at(point)?;
        Ok(self.grid.get(coord).and_then(|cell| self.cache(cell.id())))
    }

    /// Caches inside the neighborhood of `player`, in neighborhood order.
    pub fn caches_near(&mut self, player: LatLng) -> Result<Vec<&Cache>> {
        let cells = self.grid.neighborhood(player)?;
        let (by_cell, caches) = (&self.by_cell, &self.caches);
        Ok(cells
            .iter()
            .filter_map(|cell| by_cell.get(&cell.id()))
            .map(|&slot| &caches[slot])
            .collect())
    }

    /// Coins minted since the world was created.
    pub fn minted_coins(&self) -> u64 {
        self.minted
    }

    /// Coins currently held by all caches and the inventory.
    pub fn total_coins(&self) -> u64 {
        let in_caches: usize = self.caches.iter().map(Cache::len).sum();
        (in_caches + self.inventory.len()) as u64
    }

    /// Whether a cache spawns at `coord`.
    pub fn spawns_at(&self, coord: CellCoord) -> bool {
        self.luck.luck(&cell_key(coord, None)) < self.config.spawn_probability
    }

    /// Number of coins a cache at `coord` starts with.
    pub fn initial_coins(&self, coord: CellCoord) -> u32 {
        let roll = self.luck.luck(&cell_key(coord, Some(INITIAL_VALUE_KEY)));
        (roll * self.config.max_initial_coins as f64).floor().max(0.0) as u32
    }

    /// Spawns caches over the neighborhood of `center`. Cells that already hold a cache are
    /// left untouched.
    pub fn generate(&mut self, center: LatLng) -> Result<GenerateSummary> {
        self.generate_with_events(center, &mut ())
    }

    pub fn generate_with_events(
        &mut self,
        center: LatLng,
        sink: &mut dyn EventSink,
    ) -> Result<GenerateSummary> {
        let origin = self.grid.coord_at(center)?;
        let cells = self.grid.neighborhood_of(origin)?;

        if sink.wants(WorldEventKind::GenerationStarted) {
            sink.send(WorldEvent::GenerationStarted {
                center,
                origin,
                cell_count: cells.len(),
            });
        }

        let mut summary = GenerateSummary {
            cells_visited: cells.len(),
            ..Default::default()
        };

        for cell in cells {
            if !self.spawns_at(cell.coord()) {
                continue;
            }
            if self.by_cell.contains_key(&cell.id()) {
                summary.caches_existing += 1;
                continue;
            }

            let coins = self.initial_coins(cell.coord());
            self.by_cell.insert(cell.id(), self.caches.len());
            self.caches.push(Cache::minted(cell, coins));
            self.minted += coins as u64;
            summary.caches_spawned += 1;
            summary.coins_minted += coins as u64;
            debug!("Spawned cache at {} with {} coins.", cell, coins);

            if sink.wants(WorldEventKind::CacheSpawned) {
                sink.send(WorldEvent::CacheSpawned {
                    cell: cell.coord(),
                    coins,
                });
            }
        }

        info!(
            "Generated around {}: {} cells, {} new caches, {} coins minted.",
            origin, summary.cells_visited, summary.caches_spawned, summary.coins_minted
        );
        if sink.wants(WorldEventKind::GenerationFinished) {
            sink.send(WorldEvent::GenerationFinished { summary });
        }

        Ok(summary)
    }

    /// Moves the top coin of the cache at `cell` into the inventory.
    ///
    /// Returns `Ok(None)` when the cache is empty and [`Error::NoCache`] when the cell has no
    /// cache.
    pub fn collect_at(&mut self, cell: CellId) -> Result<Option<Coin>> {
        self.collect_at_with_events(cell, &mut ())
    }

    pub fn collect_at_with_events(
        &mut self,
        cell: CellId,
        sink: &mut dyn EventSink,
    ) -> Result<Option<Coin>> {
        self.transfer(cell, TransferDirection::Collect, sink)
    }

    /// Moves the top coin of the inventory into the cache at `cell`.
    ///
    /// Returns `Ok(None)` when the inventory is empty and [`Error::NoCache`] when the cell has
    /// no cache.
    pub fn deposit_at(&mut self, cell: CellId) -> Result<Option<Coin>> {
        self.deposit_at_with_events(cell, &mut ())
    }

    pub fn deposit_at_with_events(
        &mut self,
        cell: CellId,
        sink: &mut dyn EventSink,
    ) -> Result<Option<Coin>> {
        self.transfer(cell, TransferDirection::Deposit, sink)
    }

    fn transfer(
        &mut self,
        cell: CellId,
        direction: TransferDirection,
        sink: &mut dyn EventSink,
    ) -> Result<Option<Coin>> {
        let slot = self.slot_for(cell)?;
        let cache = &mut self.caches[slot];
        let coord = cache.cell().coord();

        let moved = match direction {
            TransferDirection::Collect => transfer::collect(cache, &mut self.inventory),
            TransferDirection::Deposit => transfer::deposit(cache, &mut self.inventory),
        };

        match moved {
            Some(coin) => {
                debug!("{:?} moved coin {} at {}.", direction, coin, coord);
                let (kind, event) = match direction {
                    TransferDirection::Collect => (
                        WorldEventKind::CoinCollected,
                        WorldEvent::CoinCollected { cell: coord, coin },
                    ),
                    TransferDirection::Deposit => (
                        WorldEventKind::CoinDeposited,
                        WorldEvent::CoinDeposited { cell: coord, coin },
                    ),
                };
                if sink.wants(kind) {
                    sink.send(event);
                }
            }
            None => {
                debug!("{:?} at {} skipped: nothing to move.", direction, coord);
                if sink.wants(WorldEventKind::TransferSkipped) {
                    sink.send(WorldEvent::TransferSkipped {
                        cell: coord,
                        direction,
                    });
                }
            }
        }

        Ok(moved)
    }

    fn slot_for(&self, cell: CellId) -> Result<usize> {
        let Some(c) = self.grid.cell(cell) else {
            warn!("Rejecting cell handle {} from another grid.", cell.index());
            return Err(Error::Other(format!(
                "cell handle {} was not issued by this world",
                cell.index()
            )));
        };
        match self.by_cell.get(&cell) {
            Some(&slot) => Ok(slot),
            None => {
                warn!("Transfer requested at {} which has no cache.", c);
                Err(Error::NoCache(c.coord()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    use super::*;
    use crate::world::config::OAKES_CLASSROOM;
    use crate::world::events::VecSink;

    /// Spawning cells and initial coin counts of the default world around the classroom,
    /// in neighborhood order.
    const CLASSROOM_CACHES: [(i32, i32, u32); 22] = [
        (369887, -1220624, 46),
        (369887, -1220623, 67),
        (369889, -1220635, 4),
        (369889, -1220634, 64),
        (369889, -1220631, 69),
        (369890, -1220636, 99),
        (369890, -1220635, 85),
        (369890, -1220633, 29),
        (369890, -1220626, 56),
        (369892, -1220629, 80),
        (369892, -1220624, 59),
        (369893, -1220635, 82),
        (369893, -1220626, 80),
        (369894, -1220628, 44),
        (369895, -1220631, 64),
        (369895, -1220623, 73),
        (369895, -1220622, 17),
        (369897, -1220621, 35),
        (369898, -1220629, 61),
        (369898, -1220625, 34),
        (369900, -1220624, 78),
        (369901, -1220632, 78),
    ];

    fn classroom_world() -> CacheWorld {
        let mut world = CacheWorld::new(WorldConfig::default()).unwrap();
        world.generate(OAKES_CLASSROOM).unwrap();
        world
    }

    fn layout<L: LuckSource>(world: &CacheWorld<L>) -> Vec<(i32, i32, u32)> {
        world
            .caches()
            .iter()
            .map(|c| (c.cell().lat_index(), c.cell().lng_index(), c.len() as u32))
            .collect()
    }

    /// Luck that spawns a cache only at listed cells, with the given coin roll.
    fn table_luck(table: HashMap<String, f64>) -> impl Fn(&str) -> f64 {
        move |key: &str| table.get(key).copied().unwrap_or(0.99)
    }

    #[test]
    fn classroom_layout_is_pinned() {
        let world = classroom_world();
        assert_eq!(layout(&world), CLASSROOM_CACHES.to_vec());
        assert_eq!(world.minted_coins(), 1304);
        assert_eq!(world.total_coins(), 1304);
        assert_eq!(world.grid().len(), 256);
    }

    #[test]
    fn fresh_worlds_generate_identically() {
        let a = classroom_world();
        let b = classroom_world();
        assert_eq!(layout(&a), layout(&b));
        for (ca, cb) in a.caches().iter().zip(b.caches()) {
            assert_eq!(ca.coins(), cb.coins());
        }
    }

    #[test]
    fn generate_is_idempotent_per_cell() {
        let mut world = classroom_world();
        let before = layout(&world);

        let summary = world.generate(OAKES_CLASSROOM).unwrap();
        assert_eq!(summary.cells_visited, 256);
        assert_eq!(summary.caches_spawned, 0);
        assert_eq!(summary.caches_existing, 22);
        assert_eq!(summary.coins_minted, 0);
        assert_eq!(layout(&world), before);
        assert_eq!(world.minted_coins(), 1304);
    }

    #[test]
    fn overlapping_neighborhoods_never_double_spawn() {
        let mut world = CacheWorld::new(WorldConfig::default()).unwrap();
        world.generate(OAKES_CLASSROOM).unwrap();
        let shifted = LatLng::new(OAKES_CLASSROOM.lat + 5e-4, OAKES_CLASSROOM.lng - 3e-4);
        world.generate(shifted).unwrap();

        let mut cells: Vec<CellId> = world.caches().iter().map(|c| c.cell().id()).collect();
        let spawned = cells.len();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), spawned);
        assert_eq!(world.total_coins(), world.minted_coins());
    }

    #[test]
    fn minted_coins_carry_origin_and_ascending_serials() {
        let world = classroom_world();
        for cache in world.caches() {
            for (serial, coin) in cache.coins().iter().enumerate() {
                assert_eq!(coin.origin, cache.cell().coord());
                assert_eq!(coin.serial, serial as u32);
            }
        }
    }

    #[test]
    fn spawn_probability_bounds() {
        let mut none = CacheWorld::new(WorldConfig::new().with_spawn_probability(0.0)).unwrap();
        let summary = none.generate(OAKES_CLASSROOM).unwrap();
        assert_eq!(summary.caches_spawned, 0);
        assert!(none.caches().is_empty());

        let mut all = CacheWorld::new(
            WorldConfig::new()
                .with_spawn_probability(1.0)
                .with_visibility_radius(2),
        )
        .unwrap();
        assert_eq!(all.generate(OAKES_CLASSROOM).unwrap().caches_spawned, 16);
    }

    #[test]
    fn zero_radius_generates_nothing() {
        let mut world =
            CacheWorld::new(WorldConfig::new().with_visibility_radius(0)).unwrap();
        let summary = world.generate(OAKES_CLASSROOM).unwrap();
        assert_eq!(summary, GenerateSummary::default());
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(matches!(
            CacheWorld::new(WorldConfig::new().with_spawn_probability(2.0)),
            Err(Error::InvalidConfig(_))
        ));

        let mut world = CacheWorld::new(WorldConfig::default()).unwrap();
        assert!(matches!(
            world.generate(LatLng::new(f64::NAN, 0.0)),
            Err(Error::InvalidCoordinate { .. })
        ));
        assert!(world.caches().is_empty());
        assert!(world.grid().is_empty());
    }

    #[test]
    fn collect_three_then_deposit_one() {
        let origin = CellCoord::new(369894, -1220628);
        let table = HashMap::from([
            (cell_key(origin, None), 0.0),
            (cell_key(origin, Some(INITIAL_VALUE_KEY)), 0.055),
        ]);
        let mut world =
            CacheWorld::with_luck(WorldConfig::default(), table_luck(table)).unwrap();
        world.generate(OAKES_CLASSROOM).unwrap();

        assert_eq!(world.caches().len(), 1);
        let cell = world.caches()[0].cell().id();
        assert_eq!(world.cache(cell).unwrap().len(), 5);

        for expected_serial in [4, 3, 2] {
            let coin = world.collect_at(cell).unwrap().unwrap();
            assert_eq!(coin, Coin::new(origin, expected_serial));
        }
        assert_eq!(world.deposit_at(cell).unwrap(), Some(Coin::new(origin, 2)));

        assert_eq!(world.cache(cell).unwrap().len(), 3);
        assert_eq!(world.inventory().len(), 2);
        assert_eq!(world.total_coins(), 5);
    }

    #[test]
    fn empty_transfers_are_no_ops() {
        let origin = CellCoord::new(369894, -1220628);
        let table = HashMap::from([
            (cell_key(origin, None), 0.0),
            (cell_key(origin, Some(INITIAL_VALUE_KEY)), 0.0),
        ]);
        let mut world =
            CacheWorld::with_luck(WorldConfig::default(), table_luck(table)).unwrap();
        world.generate(OAKES_CLASSROOM).unwrap();
        let cell = world.caches()[0].cell().id();

        let mut sink = VecSink::new();
        assert_eq!(world.collect_at_with_events(cell, &mut sink).unwrap(), None);
        assert_eq!(world.deposit_at_with_events(cell, &mut sink).unwrap(), None);
        assert!(world.cache(cell).unwrap().is_empty());
        assert!(world.inventory().is_empty());
        assert_eq!(
            sink.into_inner(),
            vec![
                WorldEvent::TransferSkipped {
                    cell: origin,
                    direction: TransferDirection::Collect,
                },
                WorldEvent::TransferSkipped {
                    cell: origin,
                    direction: TransferDirection::Deposit,
                },
            ]
        );
    }

    #[test]
    fn transfers_require_a_cache() {
        let mut world = classroom_world();
        let empty = world.grid_mut().cell_for(CellCoord::new(369894, -1220627));
        assert!(world.cache(empty.id()).is_none());
        assert!(matches!(
            world.collect_at(empty.id()),
            Err(Error::NoCache(c)) if c == empty.coord()
        ));

        let foreign = GridIndex::new(1.0, 1).cell_for(CellCoord::new(0, 0));
        let mut other = CacheWorld::new(WorldConfig::default()).unwrap();
        assert!(matches!(other.deposit_at(foreign.id()), Err(Error::Other(_))));
    }

    #[test]
    fn handles_from_another_grid_leave_populated_caches_alone() {
        let mut world = classroom_world();
        let victim = world.caches()[0].cell().id();

        let mut elsewhere = GridIndex::new(1.0, 1);
        let foreign = (0..=victim.index() as i32)
            .map(|lat| elsewhere.cell_for(CellCoord::new(1000 + lat, 0)))
            .last()
            .unwrap();
        assert_eq!(foreign.id().index(), victim.index());

        assert!(world.grid().cell(foreign.id()).is_none());
        assert!(world.cache(foreign.id()).is_none());
        assert!(matches!(world.collect_at(foreign.id()), Err(Error::Other(_))));
        assert!(matches!(world.deposit_at(foreign.id()), Err(Error::Other(_))));
        assert_eq!(world.cache(victim).unwrap().len(), 46);
        assert!(world.inventory().is_empty());
    }

    #[test]
    fn cache_snapshots_are_detached_from_the_world() {
        let mut world = classroom_world();
        let cell = world.caches()[0].cell().id();
        let snapshot = world.cache(cell).unwrap().clone();

        let coin = world.collect_at(cell).unwrap().unwrap();
        assert_eq!(snapshot.top(), Some(&coin));
        assert_eq!(snapshot.len(), world.cache(cell).unwrap().len() + 1);
        assert_eq!(world.total_coins(), world.minted_coins());
    }

    #[test]
    fn coins_are_conserved_under_random_transfers() {
        let mut world = classroom_world();
        let cells: Vec<CellId> = world.caches().iter().map(|c| c.cell().id()).collect();

        let mut expected: Vec<Coin> = CLASSROOM_CACHES
            .iter()
            .flat_map(|&(lat, lng, n)| (0..n).map(move |s| Coin::new(CellCoord::new(lat, lng), s)))
            .collect();
        expected.sort();

        let mut rng = StdRng::seed_from_u64(0xC0115);
        for _ in 0..5000 {
            let cell = cells[(rng.next_u32() as usize) % cells.len()];
            if rng.next_u32() % 2 == 0 {
                world.collect_at(cell).unwrap();
            } else {
                world.deposit_at(cell).unwrap();
            }
            assert_eq!(world.total_coins(), world.minted_coins());
        }

        let mut held: Vec<Coin> = world
            .caches()
            .iter()
            .flat_map(|c| c.coins().iter().copied())
            .chain(world.inventory().coins().iter().copied())
            .collect();
        held.sort();
        assert_eq!(held, expected);
    }

    #[test]
    fn generation_events_report_each_cache() {
        let mut world = CacheWorld::new(WorldConfig::default()).unwrap();
        let mut sink = VecSink::new();
        let summary = world.generate_with_events(OAKES_CLASSROOM, &mut sink).unwrap();
        let events = sink.into_inner();

        assert_eq!(events.len(), 24);
        assert_eq!(
            events[0],
            WorldEvent::GenerationStarted {
                center: OAKES_CLASSROOM,
                origin: CellCoord::new(369894, -1220628),
                cell_count: 256,
            }
        );
        assert_eq!(
            events[1],
            WorldEvent::CacheSpawned {
                cell: CellCoord::new(369887, -1220624),
                coins: 46,
            }
        );
        assert_eq!(events[23], WorldEvent::GenerationFinished { summary });
    }

    #[test]
    fn lookups_by_point_and_neighborhood() {
        let mut world = classroom_world();
        let here = world.cache_at(OAKES_CLASSROOM).unwrap().unwrap();
        assert_eq!(here.cell().coord(), CellCoord::new(369894, -1220628));
        assert_eq!(here.len(), 44);

        let near = world.caches_near(OAKES_CLASSROOM).unwrap();
        assert_eq!(near.len(), 22);

        let far = LatLng::new(OAKES_CLASSROOM.lat + 1.0, OAKES_CLASSROOM.lng);
        assert!(world.cache_at(far).unwrap().is_none());
    }
}
