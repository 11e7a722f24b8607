//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use ieeg_core::LayerCounts;
use serde::Serialize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a section heading.
pub fn heading(title: &str) {
    println!();
    println!("{}", title.bold());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print the annotation layer directory, one layer per line.
pub fn layers(counts: &LayerCounts) {
    if counts.is_empty() {
        eprintln!("{}", "No annotation layers.".dimmed());
        return;
    }
    for (layer, count) in counts {
        field(layer, &count.to_string());
    }
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
