//! Add command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ieeg_core::{Annotation, ConnectionConfig, Credentials};

use crate::output;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Dataset name
    pub dataset: String,

    /// Layer name. If missing, print the layers in the dataset.
    pub layer: Option<String>,
}

/// The two fixed annotations written by `add`.
pub fn test_annotations(author: &str, layer: &str) -> Vec<Annotation> {
    vec![
        Annotation::new(author, "Test", "A test annotation", layer, 100_000, 200_100),
        Annotation::new(author, "Test 2", "A test annotation", layer, 200_000, 300_200),
    ]
}

pub fn run(args: AddArgs, config: ConnectionConfig, credentials: Credentials) -> Result<()> {
    ieeg_http::with_session(config, credentials, |session| {
        let dataset = session.open(&args.dataset)?;

        let Some(layer) = &args.layer else {
            output::layers(&dataset.annotation_layers()?);
            return Ok(());
        };

        let batch = test_annotations(session.username(), layer);
        let directory = dataset.mutator().add(&batch)?;

        output::success(&format!("Added {} annotations to {}", batch.len(), layer));
        output::layers(&directory);
        Ok(())
    })
    .with_context(|| format!("Failed to add annotations to {}", args.dataset))
}
