//! Coin transfers between a cache and the player's inventory.
//!
//! Both directions pop the top coin of the source and push it onto the destination. An empty
//! source is a no-op reported as `None`, never an error. Callers outside the crate move coins
//! through [`crate::world::CacheWorld::collect_at`] and [`crate::world::CacheWorld::deposit_at`].
use crate::world::coin::{Cache, Coin, Inventory};

/// Moves the top coin of `cache` into `inventory`. Returns `None` if the cache is empty.
pub(crate) fn collect(cache: &mut Cache, inventory: &mut Inventory) -> Option<Coin> {
    move_top(&mut cache.coins, &mut inventory.coins)
}

/// Moves the top coin of `inventory` into `cache`. Returns `None` if the inventory is empty.
pub(crate) fn deposit(cache: &mut Cache, inventory: &mut Inventory) -> Option<Coin> {
    move_top(&mut inventory.coins, &mut cache.coins)
}

#[inline]
fn move_top(from: &mut Vec<Coin>, to: &mut Vec<Coin>) -> Option<Coin> {
    let coin = from.pop()?;
    to.push(coin);
    Some(coin)
}
