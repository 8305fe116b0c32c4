//! Event types and sinks for observing a [`crate::world::CacheWorld`] session.
//!
//! This module defines [`WorldEvent`] and a set of sinks to emit, collect, or forward events
//! while generating caches via [`crate::world::CacheWorld::generate_with_events`] or moving
//! coins via [`crate::world::CacheWorld::collect_at_with_events`] and
//! [`crate::world::CacheWorld::deposit_at_with_events`].
use crate::grid::{CellCoord, LatLng};
use crate::world::coin::Coin;
use crate::world::GenerateSummary;

/// Direction of a coin transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferDirection {
    /// Cache to inventory.
    Collect,
    /// Inventory to cache.
    Deposit,
}

/// Describes events emitted by world operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// Emitted before the neighborhood of `center` is populated.
    GenerationStarted {
        /// Point the neighborhood is centered on.
        center: LatLng,
        /// Cell containing `center`.
        origin: CellCoord,
        /// Number of cells that will be visited.
        cell_count: usize,
    },

    /// Emitted when a cache is created.
    CacheSpawned {
        /// Cell holding the new cache.
        cell: CellCoord,
        /// Coins minted into it.
        coins: u32,
    },

    /// Emitted once the neighborhood has been populated.
    GenerationFinished {
        /// Aggregated counts for the pass.
        summary: GenerateSummary,
    },

    /// Emitted when a coin moves from a cache into the inventory.
    CoinCollected {
        /// Cell of the source cache.
        cell: CellCoord,
        /// The coin that moved.
        coin: Coin,
    },

    /// Emitted when a coin moves from the inventory into a cache.
    CoinDeposited {
        /// Cell of the destination cache.
        cell: CellCoord,
        /// The coin that moved.
        coin: Coin,
    },

    /// Emitted when a transfer found its source empty.
    TransferSkipped {
        /// Cell of the cache involved.
        cell: CellCoord,
        /// Requested direction.
        direction: TransferDirection,
    },
}

/// Discriminant of [`WorldEvent`], used for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorldEventKind {
    GenerationStarted,
    CacheSpawned,
    GenerationFinished,
    CoinCollected,
    CoinDeposited,
    TransferSkipped,
}

impl WorldEvent {
    pub fn kind(&self) -> WorldEventKind {
        match self {
            WorldEvent::GenerationStarted { .. } => WorldEventKind::GenerationStarted,
            WorldEvent::CacheSpawned { .. } => WorldEventKind::CacheSpawned,
            WorldEvent::GenerationFinished { .. } => WorldEventKind::GenerationFinished,
            WorldEvent::CoinCollected { .. } => WorldEventKind::CoinCollected,
            WorldEvent::CoinDeposited { .. } => WorldEventKind::CoinDeposited,
            WorldEvent::TransferSkipped { .. } => WorldEventKind::TransferSkipped,
        }
    }
}

/// A generic event sink that accepts [`WorldEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: WorldEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: WorldEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = WorldEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: WorldEvent) {}

    #[inline]
    fn wants(&self, _kind: WorldEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(WorldEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(WorldEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(WorldEvent),
{
    #[inline]
    fn send(&mut self, event: WorldEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<WorldEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<WorldEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: WorldEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: WorldEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[S] {
        &self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: WorldEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            sink.send(event.clone());
        }
        last.send(event);
    }

    fn wants(&self, kind: WorldEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
