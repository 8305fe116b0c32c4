use geocache::prelude::*;
use geocache_examples::{config_from_args, init_tracing, render_neighborhood, TextMapStyle};

fn main() -> anyhow::Result<()> {
    init_tracing();
    // Optional RON config path as the first argument, e.g. assets/dense.ron
    let config = config_from_args()?;

    let mut world = CacheWorld::new(config)?;
    let summary = world.generate(OAKES_CLASSROOM)?;

    let map = render_neighborhood(&mut world, OAKES_CLASSROOM, TextMapStyle::default())?;
    println!("{map}");

    println!(
        "{} of {} cells hold a cache, {} coins minted.",
        summary.caches_spawned, summary.cells_visited, summary.coins_minted
    );
    for cache in world.caches() {
        let bounds = world.grid().bounds_of(&cache.cell());
        println!(
            "  cache {:>18}  coins {:>3}  sw ({:.5}, {:.5})  ne ({:.5}, {:.5})",
            cache.cell().to_string(),
            cache.len(),
            bounds.south_west.lat,
            bounds.south_west.lng,
            bounds.north_east.lat,
            bounds.north_east.lng,
        );
    }

    Ok(())
}
