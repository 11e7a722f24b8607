//! Annotation layer subcommands.

mod add;
mod delete;
mod move_layer;
mod read;

use anyhow::Result;
use clap::{Args, Subcommand};
use ieeg_core::{ConnectionConfig, Credentials};

#[derive(Args, Debug)]
pub struct AnnotationsCommand {
    #[command(subcommand)]
    pub command: AnnotationsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AnnotationsSubcommand {
    /// Read annotations from the given dataset layer
    Read(read::ReadArgs),

    /// Add two test annotations to the given dataset layer
    Add(add::AddArgs),

    /// Move annotations from the source layer to the destination layer
    Move(move_layer::MoveArgs),

    /// Delete the given annotation layer
    Delete(delete::DeleteArgs),
}

pub fn handle(
    cmd: AnnotationsCommand,
    config: ConnectionConfig,
    credentials: Credentials,
) -> Result<()> {
    match cmd.command {
        AnnotationsSubcommand::Read(args) => read::run(args, config, credentials),
        AnnotationsSubcommand::Add(args) => add::run(args, config, credentials),
        AnnotationsSubcommand::Move(args) => move_layer::run(args, config, credentials),
        AnnotationsSubcommand::Delete(args) => delete::run(args, config, credentials),
    }
}
