//! Move command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ieeg_core::{ConnectionConfig, Credentials};

use crate::output;

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Dataset name
    pub dataset: String,

    /// Source layer. If missing, print the layers in the dataset.
    #[arg(requires = "to_layer")]
    pub from_layer: Option<String>,

    /// Destination layer
    #[arg(requires = "from_layer")]
    pub to_layer: Option<String>,
}

pub fn run(args: MoveArgs, config: ConnectionConfig, credentials: Credentials) -> Result<()> {
    ieeg_http::with_session(config, credentials, |session| {
        let dataset = session.open(&args.dataset)?;
        let directory = dataset.annotation_layers()?;

        let (Some(from), Some(to)) = (&args.from_layer, &args.to_layer) else {
            output::layers(&directory);
            return Ok(());
        };

        println!(
            "Moving {} annotations from {} to {}",
            directory.get(from).copied().unwrap_or(0),
            from,
            to
        );
        let moved = dataset.mutator().move_layer(from, to)?;
        output::success(&format!("Moved {} annotations", moved));
        output::layers(&dataset.annotation_layers()?);
        Ok(())
    })
    .with_context(|| format!("Failed to move annotations in {}", args.dataset))
}
