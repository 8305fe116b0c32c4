use std::time::Duration;

use criterion::{Criterion, Throughput};
use geocache::prelude::*;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub const RADII: [u32; 4] = [4, 8, 16, 32];

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

pub fn cells_in_neighborhood(radius: u32) -> usize {
    let side = 2 * radius as usize;
    side * side
}

#[allow(dead_code)]
pub fn generated_world(radius: u32) -> CacheWorld {
    let config = WorldConfig::new().with_visibility_radius(radius);
    let mut world = CacheWorld::new(config).expect("valid config");
    world.generate(OAKES_CLASSROOM).expect("finite center");
    world
}
