//! BSG CLI - Command line tool for Bangkok subsidence and groundwater figures.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bsg-cli",
    version,
    about = "Bangkok subsidence and groundwater figure toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: bsg_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("{:?}", cli.command);
    bsg_cmd::run(cli.command)
}
