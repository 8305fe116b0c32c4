#![forbid(unsafe_code)]

mod config;
mod text_map;

pub use config::{config_from_args, load_config};
pub use text_map::{render_neighborhood, TextMapStyle};

/// Installs a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
