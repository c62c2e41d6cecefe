//! Plot rendering, schema listing and cache maintenance.

use crate::{write_json, Settings};
use anyhow::Context;
use chrono::{Datelike, Utc};
use glows_cache::{PlotCache, SystemClock};
use glows_core::http::{HttpSource, HttpSourceConfig};
use glows_plugins::{MapPlugin, PlotRequest, PlotsPlugin};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Plot arguments as given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotArgs {
    pub river_id: String,
    pub plot_name: String,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub bias: Option<String>,
    pub observed: Option<PathBuf>,
}

impl PlotArgs {
    /// Request the plots plugin would receive from the dashboard.
    pub fn into_request(self) -> anyhow::Result<PlotRequest> {
        let observed_data = match &self.observed {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read observed data {}", path.display()))?,
            ),
            None => None,
        };
        Ok(PlotRequest {
            river_id: self.river_id,
            plot_name: self.plot_name,
            year: self.year,
            month: self.month,
            bias_correction: self.bias,
            observed_data,
        })
    }
}

fn source(settings: &Settings) -> anyhow::Result<HttpSource> {
    let config = HttpSourceConfig {
        base_url: settings.api_base_url.clone(),
        retries: settings.retries.max(1),
        timeout: Duration::from_secs(settings.timeout_secs),
        ..HttpSourceConfig::default()
    };
    Ok(HttpSource::new(config)?)
}

fn cache(settings: &Settings) -> anyhow::Result<PlotCache> {
    PlotCache::new(&settings.cache_dir, SystemClock).with_context(|| {
        format!("Failed to open cache directory {}", settings.cache_dir.display())
    })
}

/// Render one chart and write its JSON.
pub async fn run_plot(settings: &Settings, args: PlotArgs, output: Option<&Path>) -> anyhow::Result<()> {
    let label = format!("{} for river {}", args.plot_name, args.river_id);
    let request = args.into_request()?;
    let plugin = PlotsPlugin::new(cache(settings)?, source(settings)?);

    info!("Rendering {}", label);
    let value = plugin
        .read(&request)
        .await
        .with_context(|| format!("Failed to render {label}"))?;
    write_json(&value, output)
}

/// Print the schemas of the plots and map plugins.
pub fn run_schema() -> anyhow::Result<()> {
    let map = MapPlugin::new().context("Failed to load country extents")?;
    let mut schemas = serde_json::Map::new();
    schemas.insert(
        glows_plugins::plots::NAME.to_string(),
        serde_json::to_value(PlotsPlugin::<HttpSource>::schema(Utc::now().year()))?,
    );
    schemas.insert(glows_plugins::map::NAME.to_string(), serde_json::to_value(map.schema())?);
    write_json(&serde_json::Value::Object(schemas), None)
}

/// Remove cache files from earlier days.
pub fn run_prune(settings: &Settings) -> anyhow::Result<()> {
    let removed = cache(settings)?.prune().context("Failed to prune cache")?;
    info!("Removed {} stale cache file(s) from {}", removed, settings.cache_dir.display());
    println!("Removed {removed} stale cache file(s)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PlotArgs {
        PlotArgs {
            river_id: "710093".to_string(),
            plot_name: "retro-fdc".to_string(),
            year: None,
            month: None,
            bias: Some("local".to_string()),
            observed: None,
        }
    }

    #[test]
    fn test_request_reads_observed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observed.json");
        std::fs::write(&path, r#"[{"Datetime": "2001-01-01", "Streamflow (m3/s)": 3.5}]"#).unwrap();

        let request = PlotArgs {
            observed: Some(path),
            ..args()
        }
        .into_request()
        .unwrap();
        assert_eq!(request.bias_correction.as_deref(), Some("local"));
        assert!(request.observed_data.unwrap().contains("Streamflow"));
    }

    #[test]
    fn test_missing_observed_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlotArgs {
            observed: Some(dir.path().join("absent.json")),
            ..args()
        }
        .into_request()
        .unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_prune_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("forecast-710093-20000101.csv"), "time,710093\n").unwrap();
        let settings = Settings {
            cache_dir: dir.path().to_path_buf(),
            api_base_url: String::new(),
            retries: 1,
            timeout_secs: 1,
        };
        run_prune(&settings).unwrap();
        assert!(!dir.path().join("forecast-710093-20000101.csv").exists());
    }
}
