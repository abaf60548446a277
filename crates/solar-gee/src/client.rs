//! Geophysical-analysis HTTP client.
//!
//! The raster analysis itself (terrain, climate, land cover, flood
//! statistics) runs in a separate service; this client only speaks its
//! contract: submit a polygon, receive the raw parameter mapping.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use solar_core::RawParameterSet;
use std::time::Duration;

/// Raster analysis over a large polygon can take a while.
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(120);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the geophysical-analysis service.
#[derive(Debug, Clone)]
pub struct GeeClient {
    client: Client,
    base_url: String,
}

impl GeeClient {
    /// Create a new analysis client pointed at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(ANALYZE_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Run the raw-parameter analysis for a GeoJSON geometry.
    ///
    /// This is the critical branch of the analysis fan-out: failure
    /// here fails the whole request, it is never defaulted.
    pub async fn analyze(&self, geometry: &Value) -> Result<RawParameterSet> {
        let url = format!("{}/analyze", self.base_url);
        tracing::debug!("Requesting geophysical analysis from {}", url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "geometry": geometry }))
            .send()
            .await
            .context("Geophysical analysis request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Geophysical analysis returned HTTP {}: {}", status, body);
        }

        response
            .json::<RawParameterSet>()
            .await
            .context("Failed to parse geophysical analysis response")
    }

    /// Liveness probe for the analysis service.
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .context("Health probe failed")?;
        if !response.status().is_success() {
            anyhow::bail!("Analysis service unhealthy: HTTP {}", response.status());
        }
        Ok(())
    }
}
