//! Server configuration from environment.

use std::env;
use std::time::Duration;

const DEFAULT_OVERPASS_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://lz4.overpass-api.de/api/interpreter",
    "https://z.overpass-api.de/api/interpreter",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Base URL of the geophysical-analysis service.
    pub gee_url: String,
    /// Prioritized list of redundant Overpass endpoints.
    pub overpass_endpoints: Vec<String>,
    /// Whole-list retry attempts in the resolver.
    pub overpass_max_attempts: u32,
    /// Backoff after a failed attempt is `base * 2^attempt`.
    pub overpass_backoff_base_ms: u64,
    pub seismic_zones_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SOLAR_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            gee_url: env::var("GEE_ANALYSIS_URL")
                .unwrap_or_else(|_| "http://localhost:8100".to_string()),
            overpass_endpoints: env::var("OVERPASS_ENDPOINTS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .ok()
                .filter(|endpoints: &Vec<String>| !endpoints.is_empty())
                .unwrap_or_else(|| {
                    DEFAULT_OVERPASS_ENDPOINTS
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),
            overpass_max_attempts: env::var("OVERPASS_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            overpass_backoff_base_ms: env::var("OVERPASS_BACKOFF_BASE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2_000),
            seismic_zones_path: env::var("SEISMIC_ZONES_PATH")
                .unwrap_or_else(|_| "data/seismic_zones.json".to_string()),
        }
    }

    pub fn overpass_backoff_base(&self) -> Duration {
        Duration::from_millis(self.overpass_backoff_base_ms.max(1))
    }
}
