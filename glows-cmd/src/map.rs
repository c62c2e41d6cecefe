//! Map configuration rendering.

use crate::write_json;
use anyhow::Context;
use glows_plugins::MapPlugin;
use log::info;
use std::path::Path;

/// Write the streamflow map configuration for `country`.
pub fn run_map(country: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let plugin = MapPlugin::new().context("Failed to load country extents")?;
    info!("Rendering map for {}", country);
    let config = plugin
        .read(country)
        .with_context(|| format!("Failed to build map for {country}"))?;
    write_json(&serde_json::to_value(config)?, output)
}
