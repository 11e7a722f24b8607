//! Export command implementation.
//!
//! Writes the text format downstream tooling reads: a `#` header with the
//! channel labels, one line of `(start, end)` spans per annotation layer,
//! summary lines for the sample window, then one line per sample row.
//! Every item on a line, including the last, is followed by `", "`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use ieeg_core::{Annotation, ConnectionConfig, Credentials, RawSampleBlock};

use crate::output;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Dataset name
    pub dataset: String,

    /// Start offset in usec
    pub start: u64,

    /// Window length in usec. The server caps how much one request may return.
    pub duration: u64,

    /// Output file name
    pub filename: PathBuf,
}

/// Everything one export file holds.
#[derive(Debug)]
pub struct Export {
    pub channel_labels: Vec<String>,
    /// Annotations per layer, in directory order.
    pub layers: Vec<(String, Vec<Annotation>)>,
    pub block: RawSampleBlock,
}

pub fn run(args: ExportArgs, config: ConnectionConfig, credentials: Credentials) -> Result<()> {
    // Fail on a bad path before touching the network.
    let file = File::create(&args.filename)
        .with_context(|| format!("Failed to create {}", args.filename.display()))?;

    eprintln!("{}", "Fetching data...".dimmed());

    let export = ieeg_http::with_session(config, credentials, |session| {
        let dataset = session.open(&args.dataset)?;

        let mut layers = Vec::new();
        for layer in dataset.annotation_layers()?.into_keys() {
            let paged = dataset.all_annotations(&layer)?;
            layers.push((layer, paged.annotations));
        }

        let all_channels: Vec<usize> = (0..dataset.channels().len()).collect();
        let block = dataset.get_data(args.start, args.duration, &all_channels)?;

        Ok(Export {
            channel_labels: dataset.channel_labels().into_iter().map(String::from).collect(),
            layers,
            block,
        })
    })
    .with_context(|| format!("Failed to export {}", args.dataset))?;

    let mut out = BufWriter::new(file);
    write_export(&mut out, &export)
        .and_then(|()| out.flush())
        .with_context(|| format!("Failed to write {}", args.filename.display()))?;

    info!(
        rows = export.block.rows(),
        columns = export.block.columns(),
        file = %args.filename.display(),
        "export written"
    );
    output::success(&format!(
        "Wrote {} samples x {} channels to {}",
        export.block.rows(),
        export.block.columns(),
        args.filename.display()
    ));
    Ok(())
}

pub fn write_export<W: Write>(out: &mut W, export: &Export) -> std::io::Result<()> {
    let block = &export.block;

    writeln!(out, "#Channel labels")?;
    write_items(out, &export.channel_labels)?;

    writeln!(out, "#Annotation (us)")?;
    for (_, annotations) in &export.layers {
        write_items(out, annotations)?;
    }

    writeln!(
        out,
        "#Raw EEG data (uV) - row: the readings of that time from all channels"
    )?;
    writeln!(out, "#Starting time (us): {}", block.start_usec())?;
    writeln!(out, "#Total duration (us): {}", block.duration_usec())?;
    writeln!(out, "#Total number of channels: {}", block.columns())?;
    writeln!(
        out,
        "#Total number of samples for each channel: {}",
        block.rows()
    )?;
    writeln!(out, "#Sampling rate (Hz): {}", format_float(block.sample_rate()))?;

    for row in block.iter_rows() {
        write_items(out, row.iter().map(|&v| format_float(v)))?;
    }
    Ok(())
}

fn write_items<W, I>(out: &mut W, items: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: std::fmt::Display,
{
    for item in items {
        write!(out, "{}, ", item)?;
    }
    writeln!(out)
}

/// Render a float the way the downstream readers expect: always a decimal
/// point or exponent, lowercase `nan`/`inf`, and a signed two-digit exponent
/// outside `1e-4..1e16`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Debug already switches to exponent form at the same thresholds.
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}
