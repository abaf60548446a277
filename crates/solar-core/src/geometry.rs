//! Spatial math for centroid extraction and nearest-distance lookups.

use crate::models::InfrastructureElement;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers.
///
/// Standard haversine on a spherical Earth. Coordinates are decimal
/// degrees.
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Closest point on the segment `a`-`b` to `point`, all in (lon, lat)
/// degrees. Projects into a local east/north frame anchored at `a` so
/// the parametric projection is done in meters, then interpolates back
/// in degree space.
fn nearest_point_on_segment(point: [f64; 2], a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    let ref_lat = a[1];
    let m_lon = meters_per_deg_lon(ref_lat).max(1e-9);
    let m_lat = meters_per_deg_lat(ref_lat).max(1e-9);

    let px = (point[0] - a[0]) * m_lon;
    let py = (point[1] - a[1]) * m_lat;
    let sx = (b[0] - a[0]) * m_lon;
    let sy = (b[1] - a[1]) * m_lat;

    let seg_len_sq = sx * sx + sy * sy;
    if seg_len_sq < 1e-4 {
        // Segment is essentially a point
        return a;
    }

    let t = ((px * sx + py * sy) / seg_len_sq).clamp(0.0, 1.0);
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

/// Closest point on a polyline to `point` and the haversine distance
/// to it in kilometers. `None` when the polyline has fewer than two
/// points.
pub fn nearest_point_on_polyline(point: [f64; 2], polyline: &[[f64; 2]]) -> Option<([f64; 2], f64)> {
    if polyline.len() < 2 {
        return None;
    }

    let mut best: Option<([f64; 2], f64)> = None;
    for pair in polyline.windows(2) {
        let candidate = nearest_point_on_segment(point, pair[0], pair[1]);
        let dist_km = haversine_distance_km(point[1], point[0], candidate[1], candidate[0]);
        if best.map(|(_, d)| dist_km < d).unwrap_or(true) {
            best = Some((candidate, dist_km));
        }
    }
    best
}

/// Nearest infrastructure element to a site centroid.
#[derive(Debug, Clone, Copy)]
pub struct NearestHit<'a> {
    /// Haversine distance from the centroid to the closest point, km.
    pub distance_km: f64,
    /// Closest point on the element, (lon, lat).
    pub point: [f64; 2],
    pub element: &'a InfrastructureElement,
}

/// Find the element closest to `centroid` (lon, lat) and the closest
/// point on it. Elements with fewer than two points are skipped.
/// Returns `None` when nothing qualifies. Exact ties keep the first
/// element seen.
pub fn nearest_element<'a>(
    centroid: [f64; 2],
    elements: &'a [InfrastructureElement],
) -> Option<NearestHit<'a>> {
    let mut best: Option<NearestHit<'a>> = None;
    for element in elements {
        let Some((point, distance_km)) = nearest_point_on_polyline(centroid, &element.points)
        else {
            continue;
        };
        if best.map(|hit| distance_km < hit.distance_km).unwrap_or(true) {
            best = Some(NearestHit {
                distance_km,
                point,
                element,
            });
        }
    }
    best
}
