//! Subcommand implementations.

pub mod annotations;
pub mod export;
pub mod metadata;

use anyhow::Result;

use crate::cli::{Cli, Commands};

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.connection.config();
    let credentials = cli.connection.credentials()?;

    match cli.command {
        Commands::Metadata(args) => metadata::run(args, config, credentials),
        Commands::Export(args) => export::run(args, config, credentials),
        Commands::Annotations(cmd) => annotations::handle(cmd, config, credentials),
    }
}
