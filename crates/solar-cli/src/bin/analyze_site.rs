//! Submit a GeoJSON site to a running suitability server.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Analyze a site polygon against a running suitability server")]
struct Args {
    /// GeoJSON file with the site polygon (or a feature collection)
    geojson: PathBuf,

    /// Server base URL
    #[arg(long, default_value = "http://localhost:8000")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.geojson)
        .with_context(|| format!("Failed to read {}", args.geojson.display()))?;
    let geometry: Value = raw
        .parse()
        .with_context(|| format!("{} is not valid JSON", args.geojson.display()))?;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/analyze", args.server))
        .json(&json!({ "geometry": geometry }))
        .send()
        .await
        .context("Request failed")?;

    let status = response.status();
    let body: Value = response.json().await.context("Non-JSON response")?;
    if !status.is_success() {
        anyhow::bail!("Server returned HTTP {status}: {body}");
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    if let Some(score) = body.get("suitabilityScore").and_then(Value::as_f64) {
        println!("\nSuitability score: {score:.2} / 10");
    }
    Ok(())
}
