//! Data model for site analysis requests and results.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A candidate site reduced to a single polygon ring of (lon, lat)
/// coordinate pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SitePolygon {
    pub exterior: Vec<[f64; 2]>,
}

impl SitePolygon {
    /// Reduce a GeoJSON-style value to a single polygon.
    ///
    /// Accepts `Polygon`, `MultiPolygon` (first polygon), `Feature`,
    /// `FeatureCollection` (first feature) and `GeometryCollection`
    /// (first geometry). Anything else, or a ring with fewer than
    /// three valid coordinate pairs, is rejected before any resolver
    /// work starts.
    pub fn from_geojson(value: &Value) -> Result<Self, AnalysisError> {
        let geometry = unwrap_geometry(value)?;
        let geom_type = geometry
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| AnalysisError::InvalidGeometry("missing geometry type".into()))?;

        let ring = match geom_type {
            "Polygon" => geometry
                .get("coordinates")
                .and_then(|c| c.get(0))
                .ok_or_else(|| AnalysisError::InvalidGeometry("polygon has no rings".into()))?,
            "MultiPolygon" => geometry
                .get("coordinates")
                .and_then(|c| c.get(0))
                .and_then(|p| p.get(0))
                .ok_or_else(|| {
                    AnalysisError::InvalidGeometry("multipolygon has no rings".into())
                })?,
            other => {
                return Err(AnalysisError::InvalidGeometry(format!(
                    "unsupported geometry type: {other}"
                )))
            }
        };

        let raw = ring
            .as_array()
            .ok_or_else(|| AnalysisError::InvalidGeometry("ring is not an array".into()))?;

        let mut exterior = Vec::with_capacity(raw.len());
        for position in raw {
            let pair = position
                .as_array()
                .filter(|p| p.len() >= 2)
                .ok_or_else(|| {
                    AnalysisError::InvalidGeometry("coordinate is not a [lon, lat] pair".into())
                })?;
            let lon = pair[0].as_f64();
            let lat = pair[1].as_f64();
            match (lon, lat) {
                (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => {
                    exterior.push([lon, lat]);
                }
                _ => {
                    return Err(AnalysisError::InvalidGeometry(
                        "coordinate is not a finite number pair".into(),
                    ))
                }
            }
        }

        // Drop the GeoJSON closing vertex before the vertex-count check
        if exterior.len() > 1 && exterior.first() == exterior.last() {
            exterior.pop();
        }
        if exterior.len() < 3 {
            return Err(AnalysisError::InvalidGeometry(
                "polygon ring needs at least 3 points".into(),
            ));
        }

        Ok(SitePolygon { exterior })
    }

    /// Area-weighted centroid of the exterior ring, (lon, lat).
    ///
    /// Falls back to the vertex mean for degenerate (near-zero area)
    /// rings.
    pub fn centroid(&self) -> [f64; 2] {
        let n = self.exterior.len();
        let mut area2 = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let [x1, y1] = self.exterior[i];
            let [x2, y2] = self.exterior[(i + 1) % n];
            let cross = x1 * y2 - x2 * y1;
            area2 += cross;
            cx += (x1 + x2) * cross;
            cy += (y1 + y2) * cross;
        }

        if area2.abs() < 1e-12 {
            let (sx, sy) = self
                .exterior
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
            return [sx / n as f64, sy / n as f64];
        }

        [cx / (3.0 * area2), cy / (3.0 * area2)]
    }
}

fn unwrap_geometry(value: &Value) -> Result<&Value, AnalysisError> {
    match value.get("type").and_then(Value::as_str) {
        Some("Feature") => value
            .get("geometry")
            .ok_or_else(|| AnalysisError::InvalidGeometry("feature has no geometry".into()))
            .and_then(unwrap_geometry),
        Some("FeatureCollection") => value
            .get("features")
            .and_then(|f| f.get(0))
            .ok_or_else(|| AnalysisError::InvalidGeometry("feature collection is empty".into()))
            .and_then(unwrap_geometry),
        Some("GeometryCollection") => value
            .get("geometries")
            .and_then(|g| g.get(0))
            .ok_or_else(|| AnalysisError::InvalidGeometry("geometry collection is empty".into()))
            .and_then(unwrap_geometry),
        Some(_) => Ok(value),
        None => Err(AnalysisError::InvalidGeometry(
            "missing geometry type".into(),
        )),
    }
}

/// One OSM-style linear feature: an ordered coordinate sequence plus
/// its tag map. Sourced per request, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct InfrastructureElement {
    /// (lon, lat) pairs, at least 2 for a usable polyline.
    pub points: Vec<[f64; 2]>,
    pub tags: HashMap<String, String>,
}

/// Raw heterogeneous parameters consumed by the scoring engine.
///
/// The geophysical collaborator produces most of these; the
/// orchestrator fills `proximity_to_lines`, `proximity_to_roads` and
/// `seismic_risk`. Unrecognized collaborator keys pass through
/// untouched so the flat response contract is preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawParameterSet {
    pub slope: Option<f64>,
    pub ghi: Option<f64>,
    pub temperature: Option<f64>,
    pub elevation: Option<f64>,
    pub land_cover: Option<f64>,
    pub proximity_to_lines: Option<f64>,
    pub proximity_to_roads: Option<f64>,
    pub water_availability: Option<f64>,
    pub soil_stability: Option<f64>,
    pub shading: Option<f64>,
    pub dust: Option<f64>,
    pub seismic_risk: Option<f64>,
    pub flood_risk: Option<f64>,
    pub land_ownership: Option<f64>,
    pub wind_speed: Option<f64>,
    pub ndvi: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Nearest power line details for the response payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearestPowerLine {
    /// Closest point on the line, [lon, lat].
    pub coordinates: [f64; 2],
    /// Canonical numeric voltage string, or "Unknown".
    pub voltage: String,
}

/// Resolved proximity between a site and the power grid.
///
/// `aerial_distance_km` is always present (25.0 km default when no
/// line was found). `road_distance_km`, when present, is never less
/// than `aerial_distance_km`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerLineProximity {
    pub aerial_distance_km: f64,
    pub road_distance_km: Option<f64>,
    pub nearest_power_line: Option<NearestPowerLine>,
}

impl PowerLineProximity {
    /// Fallback when no power line was found within the search radius.
    pub fn not_found() -> Self {
        PowerLineProximity {
            aerial_distance_km: 25.0,
            road_distance_km: None,
            nearest_power_line: None,
        }
    }
}

/// Flat analysis record returned per site: the merged raw parameters,
/// the resolved power-grid details and the composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAnalysis {
    #[serde(flatten)]
    pub raw: RawParameterSet,
    pub power_line_details: PowerLineProximity,
    pub suitability_score: f64,
}
