//! Resilient Overpass resolver.
//!
//! Executes one bounded-region feature search against a prioritized
//! list of redundant endpoints, retrying the whole list with
//! exponential backoff between attempts. First success wins; results
//! are never cross-validated between endpoints, so two disagreeing
//! endpoints resolve to whichever replied first.
//!
//! All network-layer errors are absorbed here. Callers only ever see
//! "data" or "no data"; criticality is their decision.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use solar_core::InfrastructureElement;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Solar-Suitability-App/1.0";

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    geometry: Option<Vec<OverpassGeometryPoint>>,
    tags: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct OverpassGeometryPoint {
    lat: f64,
    lon: f64,
}

/// Multi-endpoint Overpass client with bounded retries.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    endpoints: Vec<String>,
    max_attempts: u32,
    backoff_base: Duration,
}

impl OverpassClient {
    pub fn new(
        endpoints: Vec<String>,
        max_attempts: u32,
        backoff_base: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            endpoints,
            max_attempts: max_attempts.max(1),
            backoff_base,
        })
    }

    /// Run an Overpass QL query against the endpoint list.
    ///
    /// Returns the linear features of the first endpoint that answers
    /// HTTP 200 with a non-empty element list. An empty list on 200 is
    /// still a failure for that endpoint: some backends answer 200
    /// with no matches. `None` means every endpoint failed on every
    /// attempt.
    pub async fn query(&self, query: &str) -> Option<Vec<InfrastructureElement>> {
        for attempt in 0..self.max_attempts {
            for endpoint in &self.endpoints {
                tracing::debug!(endpoint, attempt, "Attempting Overpass request");
                match self.query_endpoint(endpoint, query).await {
                    Ok(response) if !response.elements.is_empty() => {
                        tracing::debug!(endpoint, "Overpass request succeeded");
                        return Some(to_infrastructure(response.elements));
                    }
                    Ok(_) => {
                        tracing::debug!(endpoint, "Overpass returned no matching elements");
                    }
                    Err(err) => {
                        tracing::warn!(endpoint, attempt, "Overpass request failed: {err:#}");
                    }
                }
            }
            if attempt + 1 < self.max_attempts {
                let delay = self.backoff_base.saturating_mul(2u32.saturating_pow(attempt));
                tracing::warn!(
                    "All Overpass endpoints failed, retrying in {:?} (attempt {})",
                    delay,
                    attempt + 2
                );
                sleep(delay).await;
            }
        }
        tracing::warn!("All Overpass endpoints failed after retries");
        None
    }

    async fn query_endpoint(&self, endpoint: &str, query: &str) -> Result<OverpassResponse> {
        let response = self
            .client
            .post(endpoint)
            .header("User-Agent", USER_AGENT)
            .form(&[("data", query)])
            .send()
            .await
            .context("request failed")?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {status}");
        }
        response.json().await.context("malformed response body")
    }
}

fn to_infrastructure(elements: Vec<OverpassElement>) -> Vec<InfrastructureElement> {
    elements
        .into_iter()
        .filter(|el| el.kind == "way")
        .filter_map(|el| {
            let points: Vec<[f64; 2]> = el
                .geometry?
                .iter()
                .map(|p| [p.lon, p.lat])
                .collect();
            if points.len() < 2 {
                return None;
            }
            Some(InfrastructureElement {
                points,
                tags: el.tags.unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_way_and_short_elements_are_dropped() {
        let parsed: OverpassResponse = serde_json::from_str(
            r#"{"elements": [
                {"type": "node", "lat": 18.0, "lon": 75.0},
                {"type": "way", "geometry": [{"lat": 18.0, "lon": 75.0}]},
                {"type": "way",
                 "geometry": [{"lat": 18.0, "lon": 75.0}, {"lat": 18.1, "lon": 75.1}],
                 "tags": {"highway": "primary"}}
            ]}"#,
        )
        .unwrap();
        let converted = to_infrastructure(parsed.elements);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].points, vec![[75.0, 18.0], [75.1, 18.1]]);
        assert_eq!(converted[0].tags.get("highway").unwrap(), "primary");
    }
}
