//! Static seismic-zone classification.
//!
//! Zone polygons are loaded once at startup and injected read-only
//! into lookups; nothing here mutates after load.

use serde_json::Value;
use std::path::Path;

/// Reported when the dataset is unavailable or no zone matches.
pub const DEFAULT_SEISMIC_ZONE: i64 = 2;

/// Edge tolerance in degrees for "touching" a zone boundary.
const EDGE_EPSILON_DEG: f64 = 1e-9;

#[derive(Debug, Clone)]
struct ZonePolygon {
    zone: i64,
    /// Exterior rings, (lon, lat).
    rings: Vec<Vec<[f64; 2]>>,
}

/// Immutable set of seismic-zone polygons.
#[derive(Debug, Clone, Default)]
pub struct SeismicZones {
    zones: Vec<ZonePolygon>,
}

impl SeismicZones {
    /// Load a GeoJSON FeatureCollection of zone polygons.
    ///
    /// An unreadable or malformed dataset degrades to an empty set
    /// (every lookup then reports the default zone); it never fails
    /// the process.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Could not read seismic zones from {}: {}", path.display(), err);
                return SeismicZones::default();
            }
        };
        match raw.parse::<Value>().map(|value| Self::from_geojson(&value)) {
            Ok(zones) => {
                tracing::info!(
                    "Loaded {} seismic zone polygons from {}",
                    zones.zones.len(),
                    path.display()
                );
                zones
            }
            Err(err) => {
                tracing::warn!("Malformed seismic zone dataset {}: {}", path.display(), err);
                SeismicZones::default()
            }
        }
    }

    /// Build the zone set from a parsed FeatureCollection. Features
    /// without a usable polygon are skipped.
    pub fn from_geojson(value: &Value) -> Self {
        let features = value
            .get("features")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let zones = features
            .iter()
            .filter_map(|feature| {
                let zone = feature
                    .get("properties")
                    .and_then(|p| p.get("zone"))
                    .and_then(Value::as_i64)
                    .unwrap_or(DEFAULT_SEISMIC_ZONE);
                let rings = extract_rings(feature.get("geometry")?)?;
                Some(ZonePolygon { zone, rings })
            })
            .collect();

        SeismicZones { zones }
    }

    /// Zone id for a point, (lon, lat). First zone containing or
    /// touching the point wins; no match reports the default zone.
    pub fn zone_for(&self, lon: f64, lat: f64) -> i64 {
        for zone in &self.zones {
            for ring in &zone.rings {
                if point_in_ring(lon, lat, ring) || point_on_ring(lon, lat, ring) {
                    return zone.zone;
                }
            }
        }
        DEFAULT_SEISMIC_ZONE
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

fn extract_rings(geometry: &Value) -> Option<Vec<Vec<[f64; 2]>>> {
    let coordinates = geometry.get("coordinates")?;
    let rings = match geometry.get("type").and_then(Value::as_str)? {
        "Polygon" => vec![parse_ring(coordinates.get(0)?)?],
        "MultiPolygon" => coordinates
            .as_array()?
            .iter()
            .filter_map(|polygon| parse_ring(polygon.get(0)?))
            .collect(),
        _ => return None,
    };
    if rings.is_empty() {
        None
    } else {
        Some(rings)
    }
}

fn parse_ring(ring: &Value) -> Option<Vec<[f64; 2]>> {
    let parsed: Vec<[f64; 2]> = ring
        .as_array()?
        .iter()
        .filter_map(|position| {
            let pair = position.as_array()?;
            Some([pair.first()?.as_f64()?, pair.get(1)?.as_f64()?])
        })
        .collect();
    if parsed.len() < 3 {
        None
    } else {
        Some(parsed)
    }
}

/// Ray casting: count edge crossings of a horizontal ray from the point.
fn point_in_ring(lon: f64, lat: f64, ring: &[[f64; 2]]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Boundary check so points exactly on a zone edge still classify.
fn point_on_ring(lon: f64, lat: f64, ring: &[[f64; 2]]) -> bool {
    let n = ring.len();
    for i in 0..n {
        let [x1, y1] = ring[i];
        let [x2, y2] = ring[(i + 1) % n];
        let dx = x2 - x1;
        let dy = y2 - y1;
        let len_sq = dx * dx + dy * dy;
        let t = if len_sq < EDGE_EPSILON_DEG {
            0.0
        } else {
            (((lon - x1) * dx + (lat - y1) * dy) / len_sq).clamp(0.0, 1.0)
        };
        let px = x1 + dx * t;
        let py = y1 + dy * t;
        let dist_sq = (lon - px) * (lon - px) + (lat - py) * (lat - py);
        if dist_sq < EDGE_EPSILON_DEG {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_zones() -> SeismicZones {
        SeismicZones::from_geojson(&json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"zone": 4},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[74.0, 17.0], [76.0, 17.0], [76.0, 19.0], [74.0, 19.0], [74.0, 17.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {"zone": 3},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[70.0, 10.0], [74.0, 10.0], [74.0, 17.0], [70.0, 17.0], [70.0, 10.0]]]
                    }
                }
            ]
        }))
    }

    #[test]
    fn point_inside_zone_classifies() {
        let zones = sample_zones();
        assert_eq!(zones.zone_for(75.0, 18.0), 4);
        assert_eq!(zones.zone_for(72.0, 12.0), 3);
    }

    #[test]
    fn point_outside_all_zones_defaults() {
        let zones = sample_zones();
        assert_eq!(zones.zone_for(80.0, 25.0), DEFAULT_SEISMIC_ZONE);
    }

    #[test]
    fn point_on_edge_classifies() {
        let zones = sample_zones();
        assert_eq!(zones.zone_for(74.0, 18.0), 4);
    }

    #[test]
    fn missing_dataset_is_empty_and_defaults() {
        let zones = SeismicZones::load("does/not/exist.json");
        assert!(zones.is_empty());
        assert_eq!(zones.zone_for(75.0, 18.0), DEFAULT_SEISMIC_ZONE);
    }
}
