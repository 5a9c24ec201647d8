mod cli;
mod config;
mod error;
mod matrix;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if !cli.quiet() {
        output::print_banner();
    }

    info!("Starting joblevels - CI matrix dependency levels");
    cli.execute()?;

    Ok(())
}
