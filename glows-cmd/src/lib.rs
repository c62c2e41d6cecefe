//! Command implementations for the GEOGLOWS plugins CLI.
//!
//! Renders plot and map JSON from a terminal, prints the plugin schemas,
//! and maintains the dataset cache.

use clap::{Args, Subcommand};
use glows_cache::DEFAULT_CACHE_DIR;
use glows_core::http::DEFAULT_BASE_URL;
use std::path::PathBuf;

pub mod map;
pub mod plot;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding the daily dataset cache
    #[arg(long, global = true, default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Base URL of the GEOGLOWS REST API
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Attempts per upstream request, including the first
    #[arg(long, global = true, default_value_t = 3)]
    pub retries: u32,

    /// Upstream request timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    pub timeout_secs: u64,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Render one chart for a river as plotly JSON
    Plot {
        /// GEOGLOWS river id
        #[arg(short = 'r', long)]
        river_id: String,

        /// Plot selector, e.g. forecast, retro-fdc, ssi-one-month
        #[arg(short = 'p', long)]
        plot_name: String,

        /// Year for retro-status, flow-regime and ssi-monthly
        #[arg(long)]
        year: Option<i32>,

        /// Month (1-12) for ssi-one-month
        #[arg(long)]
        month: Option<u32>,

        /// Bias correction mode: local or global
        #[arg(long)]
        bias: Option<String>,

        /// Observed streamflow JSON used by local bias correction
        #[arg(long)]
        observed: Option<PathBuf>,

        /// Write the JSON here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Render the streamflow map configuration for a country
    Map {
        #[arg(short = 'c', long)]
        country: String,

        /// Write the JSON here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print the parameter schemas of both plugins
    Schema,

    /// Delete cache files not stamped today
    PruneCache,
}

pub async fn run(settings: Settings, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Plot {
            river_id,
            plot_name,
            year,
            month,
            bias,
            observed,
            output,
        } => {
            let args = plot::PlotArgs {
                river_id,
                plot_name,
                year,
                month,
                bias,
                observed,
            };
            plot::run_plot(&settings, args, output.as_deref()).await
        }
        Command::Map { country, output } => map::run_map(&country, output.as_deref()),
        Command::Schema => plot::run_schema(),
        Command::PruneCache => plot::run_prune(&settings),
    }
}

/// Pretty-print `value` to `output`, or to stdout when no path is given.
pub fn write_json(value: &serde_json::Value, output: Option<&std::path::Path>) -> anyhow::Result<()> {
    use anyhow::Context;

    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
