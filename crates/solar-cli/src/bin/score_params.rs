//! Offline scoring: print the weighted per-parameter breakdown for a
//! raw parameter JSON file, without touching any external service.

use anyhow::{Context, Result};
use clap::Parser;
use solar_core::{final_weighted_score, score_breakdown, validate_weight_table, RawParameterSet};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Score a raw parameter set and print the weighted breakdown")]
struct Args {
    /// JSON file with a raw parameter mapping (camelCase keys)
    params: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    validate_weight_table().context("Invalid scoring configuration")?;

    let raw_text = std::fs::read_to_string(&args.params)
        .with_context(|| format!("Failed to read {}", args.params.display()))?;
    let raw: RawParameterSet =
        serde_json::from_str(&raw_text).context("Failed to parse raw parameters")?;

    println!(
        "{:<28} {:>12} {:>8} {:>8} {:>10}",
        "Parameter", "Raw", "Score", "Weight", "Weighted"
    );
    for row in score_breakdown(&raw) {
        let raw_value = row
            .raw_value
            .map(|v| format!("{v:.2}{}", row.unit))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:>12} {:>8.2} {:>8.2} {:>10.3}",
            row.name, raw_value, row.score, row.weight, row.weighted
        );
    }
    println!("\nFinal score: {:.2} / 10", final_weighted_score(&raw));
    Ok(())
}
