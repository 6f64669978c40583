//! gw-cli - Command line tool for village groundwater levels.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "gw-cli",
    version,
    about = "Village groundwater depth history, forecasts and dashboards"
)]
struct Cli {
    #[command(flatten)]
    global: gw_cmd::GlobalArgs,

    #[command(subcommand)]
    command: gw_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("data: {}, model: {}", cli.global.data.display(), cli.global.model.display());
    gw_cmd::run(cli.global, cli.command)
}
