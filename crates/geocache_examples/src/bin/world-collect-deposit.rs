use geocache::prelude::*;
use geocache_examples::{config_from_args, init_tracing};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = config_from_args()?;

    let mut world = CacheWorld::new(config)?;
    world.generate(OAKES_CLASSROOM)?;

    // Player walks up to the nearest cache in neighborhood order.
    let Some(cell) = world
        .caches_near(OAKES_CLASSROOM)?
        .first()
        .map(|cache| cache.cell())
    else {
        println!("No caches near the player.");
        return Ok(());
    };

    let mut log = FnSink::new(|event: WorldEvent| match event {
        WorldEvent::CoinCollected { coin, .. } => println!("  collected {coin}"),
        WorldEvent::CoinDeposited { coin, .. } => println!("  deposited {coin}"),
        WorldEvent::TransferSkipped { direction, .. } => {
            println!("  {direction:?}: nothing to move")
        }
        _ => {}
    });

    println!("Visiting cache {cell}.");
    for _ in 0..3 {
        world.collect_at_with_events(cell.id(), &mut log)?;
    }
    world.deposit_at_with_events(cell.id(), &mut log)?;

    let remaining = world.cache(cell.id()).map(Cache::len).unwrap_or_default();
    println!(
        "Cache {cell} now holds {remaining} coins; {} points accumulated.",
        world.inventory().len()
    );
    println!(
        "Coins in play: {} of {} minted.",
        world.total_coins(),
        world.minted_coins()
    );

    Ok(())
}
