//! Fan-out analysis orchestrator.
//!
//! One request fans out into exactly three concurrent branches: the
//! geophysical collaborator, the road resolver and the power-line
//! resolver. The collaborator is critical; the proximity resolvers
//! are total functions that fall back to documented defaults, so the
//! evaluation completes even when infrastructure data is missing.
//! `tokio::join!` keeps the branches on the request future: dropping
//! the request cancels all of them together.

use crate::proximity;
use crate::state::AppState;
use serde_json::Value;
use solar_core::{final_weighted_score, AnalysisError, SiteAnalysis, SitePolygon};

/// Analyze one site geometry end to end.
///
/// Fails only on invalid geometry (before any I/O) or when the
/// collaborator fails; the score would be meaningless without its raw
/// parameters.
pub async fn analyze_site(state: &AppState, geometry: &Value) -> Result<SiteAnalysis, AnalysisError> {
    let site = SitePolygon::from_geojson(geometry)?;

    tracing::info!("Starting site analysis fan-out");
    let (collaborator, road_km, power) = tokio::join!(
        state.gee().analyze(geometry),
        proximity::road_distance(state.overpass(), &site),
        proximity::power_line_distance(state.overpass(), &site),
    );

    let mut raw = collaborator.map_err(|err| {
        tracing::error!("Geophysical analysis failed: {err:#}");
        AnalysisError::Collaborator(err.to_string())
    })?;

    // Cheap and in-process, so it runs after the fan-out.
    let [lon, lat] = site.centroid();
    let zone = state.seismic().zone_for(lon, lat);

    // Collaborator keys take precedence on overlap; the orchestrator
    // only fills what the collaborator left unset.
    if raw.proximity_to_roads.is_none() {
        raw.proximity_to_roads = Some(road_km);
    }
    if raw.proximity_to_lines.is_none() {
        raw.proximity_to_lines = Some(power.aerial_distance_km);
    }
    if raw.seismic_risk.is_none() {
        raw.seismic_risk = Some(zone as f64);
    }

    let suitability_score = final_weighted_score(&raw);
    tracing::info!(suitability_score, "Site analysis complete");

    Ok(SiteAnalysis {
        raw,
        power_line_details: power,
        suitability_score,
    })
}
