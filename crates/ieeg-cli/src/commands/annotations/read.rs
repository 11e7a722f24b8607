//! Read command implementation.

use anyhow::{Context, Result};
use clap::Args;

use ieeg_core::{ConnectionConfig, Credentials};

use crate::output;

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Dataset name
    pub dataset: String,

    /// Layer name. If missing, print the layers in the dataset.
    pub layer: Option<String>,

    /// Records requested per call
    #[arg(long, default_value_t = ieeg_core::annotations::DEFAULT_PAGE_SIZE)]
    pub page_size: u64,
}

pub fn run(args: ReadArgs, config: ConnectionConfig, credentials: Credentials) -> Result<()> {
    ieeg_http::with_session(config, credentials, |session| {
        let dataset = session.open(&args.dataset)?;

        let Some(layer) = &args.layer else {
            output::layers(&dataset.annotation_layers()?);
            return Ok(());
        };

        let paged = dataset.pager(layer).page_size(args.page_size).fetch_all()?;
        for (call, page) in paged.pages().enumerate() {
            if let (Some(first), Some(last)) = (page.first(), page.last()) {
                println!(
                    "got {} annotations on call # {} covering {} usec to {} usec",
                    page.len(),
                    call + 1,
                    first.start_time_offset_usec,
                    last.end_time_offset_usec
                );
            }
        }
        println!("got {} annotations in total", paged.annotations.len());

        if !paged.is_complete() {
            output::warning(&format!(
                "layer reported {} annotations when reading started",
                paged.expected_count
            ));
        }
        Ok(())
    })
    .with_context(|| format!("Failed to read annotations from {}", args.dataset))
}
