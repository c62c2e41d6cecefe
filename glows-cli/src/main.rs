//! GEOGLOWS CLI - render streamflow charts and maps from the command line.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "glows-cli",
    version,
    about = "GEOGLOWS streamflow charts and maps"
)]
struct Cli {
    #[command(flatten)]
    settings: glows_cmd::Settings,

    #[command(subcommand)]
    command: glows_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Using cache directory {}", cli.settings.cache_dir.display());
    glows_cmd::run(cli.settings, cli.command).await
}
