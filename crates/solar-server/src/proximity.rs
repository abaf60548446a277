//! Road and power-line proximity resolvers.
//!
//! Both are total: every failure path collapses to a documented
//! default so a site evaluation can always complete, if with degraded
//! infrastructure confidence.

use crate::overpass::OverpassClient;
use solar_core::geometry::nearest_element;
use solar_core::{NearestPowerLine, PowerLineProximity, SitePolygon};
use std::collections::HashMap;

/// Highway classes that count as usable access roads.
const ROAD_CLASSES: &str = "primary|secondary|tertiary|trunk";
/// Transmission-class voltage strings accepted on `power=line` ways.
const VOLTAGE_CLASSES: &str =
    "60|30|110|220|400|500|750|1000|60000|30000|110000|220000|400000|500000|750000|1000000";

const ROAD_SEARCH_RADIUS_M: u32 = 5_000;
const POWER_SEARCH_RADIUS_M: u32 = 25_000;

/// Distance reported when no road is found within the search radius.
pub const DEFAULT_ROAD_DISTANCE_KM: f64 = 10.0;

/// Routed distance can never be shorter than the straight line; when
/// the road+aerial approximation breaks that, clamp to this multiple
/// of the aerial distance.
const ROAD_CLAMP_FACTOR: f64 = 1.15;

fn road_query(lat: f64, lon: f64) -> String {
    format!(
        "[out:json][timeout:15];way[\"highway\"~\"^({ROAD_CLASSES})$\"](around:{ROAD_SEARCH_RADIUS_M},{lat},{lon});out geom;"
    )
}

fn power_query(lat: f64, lon: f64) -> String {
    format!(
        "[out:json][timeout:15];(way[\"power\"=\"line\"][\"voltage\"~\"^({VOLTAGE_CLASSES})$\"](around:{POWER_SEARCH_RADIUS_M},{lat},{lon}););out geom;"
    )
}

/// Distance from the site centroid to the nearest classified road, km.
///
/// Never fails: no data within 5 km resolves to
/// [`DEFAULT_ROAD_DISTANCE_KM`].
pub async fn road_distance(overpass: &OverpassClient, site: &SitePolygon) -> f64 {
    let [lon, lat] = site.centroid();
    let Some(elements) = overpass.query(&road_query(lat, lon)).await else {
        tracing::info!("No roads found within 5km, using default distance");
        return DEFAULT_ROAD_DISTANCE_KM;
    };
    match nearest_element([lon, lat], &elements) {
        Some(hit) => {
            tracing::info!("Found nearest road at {:.2}km", hit.distance_km);
            hit.distance_km
        }
        None => DEFAULT_ROAD_DISTANCE_KM,
    }
}

/// Nearest transmission line to the site centroid.
///
/// Never fails: no usable line within 25 km resolves to the
/// [`PowerLineProximity::not_found`] default. The road distance is an
/// approximation (centroid to nearest road, plus the aerial leg), not
/// a routed shortest path.
pub async fn power_line_distance(
    overpass: &OverpassClient,
    site: &SitePolygon,
) -> PowerLineProximity {
    let [lon, lat] = site.centroid();
    let Some(elements) = overpass.query(&power_query(lat, lon)).await else {
        tracing::info!("No power lines found within 25km, using default distance");
        return PowerLineProximity::not_found();
    };
    let Some(hit) = nearest_element([lon, lat], &elements) else {
        return PowerLineProximity::not_found();
    };

    let aerial_km = hit.distance_km;
    tracing::info!("Found nearest power line at {:.2}km", aerial_km);

    let road_distance_km = match overpass.query(&road_query(lat, lon)).await {
        Some(roads) => nearest_element([lon, lat], &roads)
            .map(|road| combine_road_distance(road.distance_km, aerial_km)),
        None => None,
    };

    PowerLineProximity {
        aerial_distance_km: aerial_km,
        road_distance_km,
        nearest_power_line: Some(NearestPowerLine {
            coordinates: hit.point,
            voltage: parse_voltage(&hit.element.tags),
        }),
    }
}

/// Combine the centroid-to-road leg with the aerial leg, preserving
/// the invariant that the routed estimate is never below the straight
/// line.
fn combine_road_distance(nearest_road_km: f64, aerial_km: f64) -> f64 {
    let combined = nearest_road_km + aerial_km;
    if combined < aerial_km {
        aerial_km * ROAD_CLAMP_FACTOR
    } else {
        combined
    }
}

/// Canonical voltage string from a feature's `voltage` tag.
///
/// Takes every decimal digit run, keeps plausible values
/// (0 < v < 1,000,000 volts) and reports the maximum; "Unknown" when
/// the tag is missing or yields nothing usable.
fn parse_voltage(tags: &HashMap<String, String>) -> String {
    let Some(raw) = tags.get("voltage") else {
        return "Unknown".to_string();
    };

    let mut best: Option<u64> = None;
    let mut current: Option<u64> = None;
    for ch in raw.chars() {
        if let Some(digit) = ch.to_digit(10) {
            current = Some(current.unwrap_or(0).saturating_mul(10) + digit as u64);
        } else if let Some(value) = current.take() {
            if value > 0 && value < 1_000_000 {
                best = Some(best.map_or(value, |b| b.max(value)));
            }
        }
    }
    if let Some(value) = current {
        if value > 0 && value < 1_000_000 {
            best = Some(best.map_or(value, |b| b.max(value)));
        }
    }

    best.map(|v| v.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tags(voltage: &str) -> HashMap<String, String> {
        HashMap::from([("voltage".to_string(), voltage.to_string())])
    }

    #[test]
    fn voltage_takes_maximum_numeric_run() {
        assert_eq!(parse_voltage(&tags("110000;220000")), "220000");
        assert_eq!(parse_voltage(&tags("400 kV")), "400");
        assert_eq!(parse_voltage(&tags("220000")), "220000");
    }

    #[test]
    fn voltage_rejects_implausible_values() {
        assert_eq!(parse_voltage(&tags("0")), "Unknown");
        assert_eq!(parse_voltage(&tags("2000000")), "Unknown");
        assert_eq!(parse_voltage(&tags("2000000;400000")), "400000");
    }

    #[test]
    fn voltage_without_digits_is_unknown() {
        assert_eq!(parse_voltage(&tags("medium")), "Unknown");
        assert_eq!(parse_voltage(&HashMap::new()), "Unknown");
    }

    #[test]
    fn combined_road_distance_never_below_aerial() {
        assert_eq!(combine_road_distance(2.0, 5.0), 7.0);
        // Defensive clamp path
        assert_eq!(combine_road_distance(-1.0, 5.0), 5.0 * 1.15);
    }

    #[test]
    fn queries_carry_radius_and_classes() {
        let road = road_query(18.0, 75.0);
        assert!(road.contains("around:5000,18,75"));
        assert!(road.contains("primary|secondary|tertiary|trunk"));

        let power = power_query(18.0, 75.0);
        assert!(power.contains("around:25000,18,75"));
        assert!(power.contains("\"power\"=\"line\""));
        assert!(power.contains("voltage"));
    }

    #[tokio::test]
    async fn road_distance_defaults_when_endpoints_unreachable() {
        // Bind and drop a listener so the port is free and refuses
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let overpass = OverpassClient::new(
            vec![format!("http://{addr}/api/interpreter")],
            1,
            Duration::from_millis(1),
        )
        .unwrap();
        let site = SitePolygon {
            exterior: vec![[75.0, 18.0], [75.1, 18.0], [75.1, 18.1]],
        };
        assert_eq!(
            road_distance(&overpass, &site).await,
            DEFAULT_ROAD_DISTANCE_KM
        );

        let power = power_line_distance(&overpass, &site).await;
        assert_eq!(power.aerial_distance_km, 25.0);
        assert!(power.road_distance_km.is_none());
        assert!(power.nearest_power_line.is_none());
    }
}
