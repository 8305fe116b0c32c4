use std::fs;
use std::path::Path;

use anyhow::Context;
use geocache::prelude::*;
use tracing::info;

/// Reads a RON-encoded [`WorldConfig`]. Missing fields take their defaults.
pub fn load_config(path: &Path) -> anyhow::Result<WorldConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: WorldConfig = ron::de::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    info!("Loaded world config from {}.", path.display());
    Ok(config)
}

/// Loads the config named by the first command line argument, or the defaults without one.
pub fn config_from_args() -> anyhow::Result<WorldConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => load_config(Path::new(&path)),
        None => Ok(WorldConfig::default()),
    }
}
