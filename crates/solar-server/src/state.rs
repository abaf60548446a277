//! Shared application state.
//!
//! Everything here is built once at startup and read-only afterwards;
//! per-request entities never live in shared state.

use crate::config::Config;
use crate::overpass::OverpassClient;
use crate::seismic::SeismicZones;
use anyhow::Result;
use solar_gee::GeeClient;

pub struct AppState {
    config: Config,
    gee: GeeClient,
    overpass: OverpassClient,
    seismic: SeismicZones,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let gee = GeeClient::new(config.gee_url.clone())?;
        let overpass = OverpassClient::new(
            config.overpass_endpoints.clone(),
            config.overpass_max_attempts,
            config.overpass_backoff_base(),
        )?;
        let seismic = SeismicZones::load(&config.seismic_zones_path);
        Ok(Self {
            config,
            gee,
            overpass,
            seismic,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gee(&self) -> &GeeClient {
        &self.gee
    }

    pub fn overpass(&self) -> &OverpassClient {
        &self.overpass
    }

    pub fn seismic(&self) -> &SeismicZones {
        &self.seismic
    }
}
