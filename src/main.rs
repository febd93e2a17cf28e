use anyhow::Result;
use clap::Parser;

use apertium_setup::cli::{Cli, Commands};
use apertium_setup::{commands, logging};

fn main() -> Result<()> {
    // Initialize structured logging
    logging::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Show(args) => commands::show::run(args),
    }
}
