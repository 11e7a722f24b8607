//! Metadata command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use ieeg_core::{Annotation, Channel, ConnectionConfig, Credentials, LayerCounts, Montage};

use crate::output;

#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Dataset name
    pub dataset: String,

    /// Print everything as one JSON document
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct MetadataReport {
    dataset: String,
    snapshot_id: String,
    channels: Vec<Channel>,
    layers: LayerCounts,
    annotations: BTreeMap<String, Vec<Annotation>>,
    montage: Option<Montage>,
}

pub fn run(args: MetadataArgs, config: ConnectionConfig, credentials: Credentials) -> Result<()> {
    let report = ieeg_http::with_session(config, credentials, |session| {
        let dataset = session.open(&args.dataset)?;
        let layers = dataset.annotation_layers()?;

        let mut annotations = BTreeMap::new();
        for layer in layers.keys() {
            let paged = dataset.all_annotations(layer)?;
            if !paged.is_complete() {
                output::warning(&format!(
                    "layer {} changed while reading: expected {}, got {}",
                    layer,
                    paged.expected_count,
                    paged.annotations.len()
                ));
            }
            annotations.insert(layer.clone(), paged.annotations);
        }

        Ok(MetadataReport {
            dataset: dataset.name().to_string(),
            snapshot_id: dataset.snapshot_id().to_string(),
            channels: dataset.channels().to_vec(),
            layers,
            annotations,
            montage: dataset.get_current_montage().cloned(),
        })
    })
    .with_context(|| format!("Failed to read metadata for {}", args.dataset))?;

    if args.json {
        return output::json_pretty(&report);
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &MetadataReport) {
    output::field("Dataset", &report.dataset);
    output::field("Snapshot", &report.snapshot_id);

    output::heading("Basic Channel Info:");
    for channel in &report.channels {
        println!(
            "{} {} Hz, {}{}",
            format!("[{}] {}", channel.index, channel.label).cyan(),
            channel.sample_rate,
            channel.unit,
            channel
                .number_of_samples
                .map(|n| format!(", {} samples", n))
                .unwrap_or_default()
        );
    }

    output::heading("Annotation layers:");
    output::layers(&report.layers);

    for (layer, annotations) in &report.annotations {
        output::heading(&format!("Key - {} (start_time, end_time in us):", layer));
        let spans: Vec<String> = annotations.iter().map(ToString::to_string).collect();
        println!("{}", spans.join(", "));
    }

    output::heading("Current Montage:");
    match &report.montage {
        Some(montage) => {
            output::field("Name", &montage.name);
            for pair in &montage.pairs {
                match &pair.reference {
                    Some(reference) => println!("  {} - {}", pair.channel, reference),
                    None => println!("  {}", pair.channel),
                }
            }
        }
        None => println!("{}", "none".dimmed()),
    }
}
