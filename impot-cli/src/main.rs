use anyhow::Result;
use clap::Parser;
use tracing::debug;

use impot_cli::{cli::Cli, commands, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(command = ?cli.command, "starting");

    let output = commands::run(&cli)?;
    println!("{output}");

    Ok(())
}
