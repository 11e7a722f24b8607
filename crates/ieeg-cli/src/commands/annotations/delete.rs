//! Delete command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ieeg_core::{ConnectionConfig, Credentials};

use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Dataset name
    pub dataset: String,

    /// Layer name. If missing, print the layers in the dataset.
    pub layer: Option<String>,
}

pub fn run(args: DeleteArgs, config: ConnectionConfig, credentials: Credentials) -> Result<()> {
    ieeg_http::with_session(config, credentials, |session| {
        let dataset = session.open(&args.dataset)?;
        let directory = dataset.annotation_layers()?;

        let Some(layer) = &args.layer else {
            output::layers(&directory);
            return Ok(());
        };

        println!(
            "Deleting {} annotations from {}",
            directory.get(layer).copied().unwrap_or(0),
            layer
        );
        let deleted = dataset.mutator().delete_layer(layer)?;
        output::success(&format!("Deleted {} annotations", deleted));
        output::layers(&dataset.annotation_layers()?);
        Ok(())
    })
    .with_context(|| format!("Failed to delete annotations from {}", args.dataset))
}
