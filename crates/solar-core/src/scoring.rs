//! Multi-criteria suitability scoring.
//!
//! Deterministic normalization of raw site parameters into a single
//! weighted score in [0, 10]. The weight table is the sole tunable and
//! must sum to exactly 1.0; this is validated once at startup, never
//! renormalized silently.

use crate::models::RawParameterSet;
use serde::Serialize;
use thiserror::Error;

/// Parameter keys consumed by the scoring table. NDVI is deliberately
/// absent: it only modifies the land-cover score, it is never scored
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterKey {
    Slope,
    Ghi,
    Temperature,
    Elevation,
    LandCover,
    ProximityToLines,
    ProximityToRoads,
    WaterAvailability,
    SoilStability,
    Shading,
    Dust,
    SeismicRisk,
    FloodRisk,
    LandOwnership,
    WindSpeed,
}

#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub best: f64,
    pub worst: f64,
}

/// One static scoring-table entry.
#[derive(Debug, Clone, Copy)]
pub struct ScoringParameter {
    pub key: ParameterKey,
    pub name: &'static str,
    pub unit: &'static str,
    pub weight: f64,
    pub higher_is_better: bool,
    pub thresholds: Option<Thresholds>,
}

const fn thresholded(
    key: ParameterKey,
    name: &'static str,
    unit: &'static str,
    weight: f64,
    higher_is_better: bool,
    best: f64,
    worst: f64,
) -> ScoringParameter {
    ScoringParameter {
        key,
        name,
        unit,
        weight,
        higher_is_better,
        thresholds: Some(Thresholds { best, worst }),
    }
}

const fn categorical(
    key: ParameterKey,
    name: &'static str,
    unit: &'static str,
    weight: f64,
) -> ScoringParameter {
    ScoringParameter {
        key,
        name,
        unit,
        weight,
        higher_is_better: false,
        thresholds: None,
    }
}

/// The fourteen weighted parameters. Wind speed is scored separately
/// (see [`WIND_SPEED`]); together the weights sum to exactly 1.0.
pub const PARAMETERS: [ScoringParameter; 14] = [
    thresholded(ParameterKey::Slope, "Slope", "°", 0.20, false, 5.7, 15.0),
    thresholded(ParameterKey::Ghi, "Sunlight (GHI)", " kWh/m²/day", 0.15, true, 5.5, 4.5),
    thresholded(ParameterKey::Temperature, "Avg. Temperature", " °C", 0.07, false, 25.0, 40.0),
    categorical(ParameterKey::Elevation, "Elevation", " m", 0.03),
    categorical(ParameterKey::LandCover, "Land Cover", "", 0.10),
    thresholded(ParameterKey::ProximityToLines, "Proximity to Power Lines", " km", 0.10, false, 1.0, 15.0),
    thresholded(ParameterKey::ProximityToRoads, "Proximity to Roads", " km", 0.05, false, 1.0, 10.0),
    thresholded(ParameterKey::WaterAvailability, "Water Availability", " km", 0.05, false, 2.0, 15.0),
    thresholded(ParameterKey::SoilStability, "Soil Stability (Depth)", " cm", 0.05, true, 100.0, 20.0),
    thresholded(ParameterKey::Shading, "Shading (Hillshade)", "", 0.05, true, 200.0, 100.0),
    thresholded(ParameterKey::Dust, "Dust (Aerosol Index)", "", 0.03, false, 0.1, 0.5),
    thresholded(ParameterKey::SeismicRisk, "Seismic Risk (PGA)", " g", 0.02, false, 0.1, 0.4),
    thresholded(ParameterKey::FloodRisk, "Flood Risk", " ha", 0.02, false, 0.0, 5.0),
    categorical(ParameterKey::LandOwnership, "Land Ownership", "", 0.06),
];

/// Wind speed is tracked outside the main table but participates in
/// the weighted sum.
pub const WIND_SPEED: ScoringParameter =
    thresholded(ParameterKey::WindSpeed, "Wind Speed", " km/h", 0.02, false, 20.0, 90.0);

#[derive(Debug, Error)]
#[error("scoring weights sum to {sum}, expected exactly 1.0")]
pub struct WeightTableError {
    pub sum: f64,
}

/// Startup check: the fixed weight table must sum to exactly 1.0.
/// A violation refuses to start scoring, it is never renormalized.
pub fn validate_weight_table() -> Result<(), WeightTableError> {
    let sum = PARAMETERS.iter().map(|p| p.weight).sum::<f64>() + WIND_SPEED.weight;
    if (sum - 1.0).abs() > 1e-9 {
        return Err(WeightTableError { sum });
    }
    Ok(())
}

fn raw_value(raw: &RawParameterSet, key: ParameterKey) -> Option<f64> {
    match key {
        ParameterKey::Slope => raw.slope,
        ParameterKey::Ghi => raw.ghi,
        ParameterKey::Temperature => raw.temperature,
        ParameterKey::Elevation => raw.elevation,
        ParameterKey::LandCover => raw.land_cover,
        ParameterKey::ProximityToLines => raw.proximity_to_lines,
        ParameterKey::ProximityToRoads => raw.proximity_to_roads,
        ParameterKey::WaterAvailability => raw.water_availability,
        ParameterKey::SoilStability => raw.soil_stability,
        ParameterKey::Shading => raw.shading,
        ParameterKey::Dust => raw.dust,
        ParameterKey::SeismicRisk => raw.seismic_risk,
        ParameterKey::FloodRisk => raw.flood_risk,
        ParameterKey::LandOwnership => raw.land_ownership,
        ParameterKey::WindSpeed => raw.wind_speed,
    }
}

/// Raster "mode" reducers can return near-integer floats for
/// categorical parameters; round them before classification.
fn fix_precision(key: ParameterKey, value: Option<f64>) -> Option<f64> {
    match key {
        ParameterKey::LandCover | ParameterKey::LandOwnership => value.map(f64::round),
        _ => value,
    }
}

/// Generic per-parameter normalization.
///
/// Missing values score 0 (the harshest penalty, not neutral);
/// parameters without thresholds score a fixed neutral 5; otherwise a
/// linear interpolation bounded to [1, 10] in the threshold direction.
pub fn calculate_score(value: Option<f64>, param: &ScoringParameter) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };
    let Some(Thresholds { best, worst }) = param.thresholds else {
        return 5.0;
    };
    if param.higher_is_better {
        if value >= best {
            10.0
        } else if value <= worst {
            1.0
        } else {
            1.0 + 9.0 * ((value - worst) / (best - worst))
        }
    } else if value <= best {
        10.0
    } else if value >= worst {
        1.0
    } else {
        1.0 + 9.0 * ((worst - value) / (worst - best))
    }
}

/// ESA WorldCover-style classification of the ground surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LandCoverClass {
    TreeCover,
    Cropland,
    Grassland,
    Shrubland,
    BuiltUp,
    BareSoil,
    SnowIce,
    Water,
    Wetland,
    Mangrove,
    MossLichen,
}

impl LandCoverClass {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            10 => Some(LandCoverClass::TreeCover),
            20 => Some(LandCoverClass::Cropland),
            30 => Some(LandCoverClass::Grassland),
            40 => Some(LandCoverClass::Shrubland),
            50 => Some(LandCoverClass::BuiltUp),
            60 => Some(LandCoverClass::BareSoil),
            70 => Some(LandCoverClass::SnowIce),
            80 => Some(LandCoverClass::Water),
            90 => Some(LandCoverClass::Wetland),
            95 => Some(LandCoverClass::Mangrove),
            100 => Some(LandCoverClass::MossLichen),
            _ => None,
        }
    }

    /// Base suitability of the class for panel installation.
    fn base_score(self, ndvi: Option<f64>) -> f64 {
        match self {
            LandCoverClass::BuiltUp => 1.0,
            LandCoverClass::Water | LandCoverClass::Wetland | LandCoverClass::Mangrove => {
                // Low NDVI over a flooded class suggests standing water
                if ndvi.map(|v| v < 0.1).unwrap_or(false) {
                    0.0
                } else {
                    2.0
                }
            }
            LandCoverClass::TreeCover => 3.0,
            LandCoverClass::Grassland | LandCoverClass::Shrubland | LandCoverClass::BareSoil => {
                10.0
            }
            LandCoverClass::Cropland => 8.0,
            LandCoverClass::SnowIce | LandCoverClass::MossLichen => 5.0,
        }
    }

    /// How much of a vegetated pixel remains usable for panels.
    fn usability_factor(self) -> f64 {
        match self {
            LandCoverClass::TreeCover => 0.3,
            LandCoverClass::Cropland => 0.8,
            LandCoverClass::Grassland | LandCoverClass::BareSoil => 1.0,
            LandCoverClass::Shrubland => 0.6,
            LandCoverClass::BuiltUp => 0.1,
            LandCoverClass::SnowIce | LandCoverClass::Water => 0.0,
            LandCoverClass::Wetland | LandCoverClass::Mangrove => 0.2,
            LandCoverClass::MossLichen => 0.5,
        }
    }
}

/// Land-cover score with the NDVI modifier.
///
/// NDVI below -0.1 forces 0 regardless of class (negative biomass is
/// almost certainly water). Healthy vegetation (NDVI > 0.3) over a
/// usable class (factor >= 0.6) earns a small positive adjustment,
/// clamped at 10.
pub fn enhanced_land_cover_score(land_cover: Option<f64>, ndvi: Option<f64>) -> f64 {
    if ndvi.map(|v| v < -0.1).unwrap_or(false) {
        return 0.0;
    }

    let class = fix_precision(ParameterKey::LandCover, land_cover)
        .map(|code| code as i64)
        .and_then(LandCoverClass::from_code);
    let mut score = class.map(|c| c.base_score(ndvi)).unwrap_or(5.0);

    if let (Some(class), Some(ndvi)) = (class, ndvi) {
        if ndvi > 0.3 && score > 0.0 {
            let factor = class.usability_factor();
            if factor >= 0.6 {
                score = (score + ndvi * 0.2 * factor).min(10.0);
            }
        }
    }
    score
}

fn parameter_score(raw: &RawParameterSet, param: &ScoringParameter) -> f64 {
    let value = fix_precision(param.key, raw_value(raw, param.key));
    match param.key {
        // Government/public land (code 1) is ideal, anything else neutral
        ParameterKey::LandOwnership => {
            if value == Some(1.0) {
                10.0
            } else {
                5.0
            }
        }
        // In-range check only, no interpolation
        ParameterKey::Elevation => {
            if value.map(|v| (50.0..=1500.0).contains(&v)).unwrap_or(false) {
                10.0
            } else {
                2.0
            }
        }
        ParameterKey::LandCover => enhanced_land_cover_score(value, raw.ndvi),
        _ => calculate_score(value, param),
    }
}

/// Composite suitability score in [0, 10]. Pure and total: missing
/// values degrade the score, they never fail it.
pub fn final_weighted_score(raw: &RawParameterSet) -> f64 {
    let mut total = 0.0;
    for param in &PARAMETERS {
        total += parameter_score(raw, param) * param.weight;
    }
    total += calculate_score(
        fix_precision(WIND_SPEED.key, raw.wind_speed),
        &WIND_SPEED,
    ) * WIND_SPEED.weight;
    total.clamp(0.0, 10.0)
}

/// One row of the per-parameter audit trail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterScore {
    pub key: ParameterKey,
    pub name: &'static str,
    pub unit: &'static str,
    pub raw_value: Option<f64>,
    pub score: f64,
    pub weight: f64,
    pub weighted: f64,
}

/// Per-parameter breakdown of the composite score, in table order with
/// wind speed last.
pub fn score_breakdown(raw: &RawParameterSet) -> Vec<ParameterScore> {
    let mut rows: Vec<ParameterScore> = PARAMETERS
        .iter()
        .map(|param| {
            let score = parameter_score(raw, param);
            ParameterScore {
                key: param.key,
                name: param.name,
                unit: param.unit,
                raw_value: raw_value(raw, param.key),
                score,
                weight: param.weight,
                weighted: score * param.weight,
            }
        })
        .collect();

    let wind_score = calculate_score(
        fix_precision(WIND_SPEED.key, raw.wind_speed),
        &WIND_SPEED,
    );
    rows.push(ParameterScore {
        key: WIND_SPEED.key,
        name: WIND_SPEED.name,
        unit: WIND_SPEED.unit,
        raw_value: raw.wind_speed,
        score: wind_score,
        weight: WIND_SPEED.weight,
        weighted: wind_score * WIND_SPEED.weight,
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_table_sums_to_one() {
        validate_weight_table().unwrap();
    }

    #[test]
    fn thresholded_endpoints_hit_bounds() {
        for param in PARAMETERS.iter().chain(std::iter::once(&WIND_SPEED)) {
            let Some(Thresholds { best, worst }) = param.thresholds else {
                continue;
            };
            assert_eq!(calculate_score(Some(best), param), 10.0, "{}", param.name);
            assert_eq!(calculate_score(Some(worst), param), 1.0, "{}", param.name);
        }
    }

    #[test]
    fn score_is_monotonic_in_threshold_direction() {
        for param in PARAMETERS.iter().chain(std::iter::once(&WIND_SPEED)) {
            let Some(Thresholds { best, worst }) = param.thresholds else {
                continue;
            };
            let lo = best.min(worst);
            let hi = best.max(worst);
            let steps: Vec<f64> = (0..=20)
                .map(|i| lo + (hi - lo) * (i as f64) / 20.0)
                .collect();
            let mut previous: Option<f64> = None;
            for value in steps {
                let score = calculate_score(Some(value), param);
                assert!((1.0..=10.0).contains(&score), "{}", param.name);
                if let Some(previous) = previous {
                    if param.higher_is_better {
                        assert!(score >= previous, "{}", param.name);
                    } else {
                        assert!(score <= previous, "{}", param.name);
                    }
                }
                previous = Some(score);
            }
        }
    }

    #[test]
    fn missing_value_scores_zero_not_neutral() {
        assert_eq!(calculate_score(None, &PARAMETERS[0]), 0.0);
    }

    #[test]
    fn parameter_without_thresholds_is_neutral() {
        let param = categorical(ParameterKey::Elevation, "Elevation", " m", 0.03);
        assert_eq!(calculate_score(Some(123.0), &param), 5.0);
    }

    #[test]
    fn slope_interpolates_linearly() {
        // Midpoint of [5.7, 15] for a lower-is-better parameter
        let mid = (5.7 + 15.0) / 2.0;
        let score = calculate_score(Some(mid), &PARAMETERS[0]);
        assert!((score - 5.5).abs() < 1e-9);
    }

    #[test]
    fn land_ownership_is_binary() {
        let mut raw = RawParameterSet::default();
        raw.land_ownership = Some(1.0);
        let gov = parameter_score(&raw, &PARAMETERS[13]);
        assert_eq!(gov, 10.0);

        raw.land_ownership = Some(2.0);
        assert_eq!(parameter_score(&raw, &PARAMETERS[13]), 5.0);

        // Mode reducer artifacts round to the nearest class
        raw.land_ownership = Some(0.9999);
        assert_eq!(parameter_score(&raw, &PARAMETERS[13]), 10.0);

        raw.land_ownership = None;
        assert_eq!(parameter_score(&raw, &PARAMETERS[13]), 5.0);
    }

    #[test]
    fn elevation_is_range_checked() {
        let mut raw = RawParameterSet::default();
        raw.elevation = Some(400.0);
        assert_eq!(parameter_score(&raw, &PARAMETERS[3]), 10.0);

        raw.elevation = Some(2500.0);
        assert_eq!(parameter_score(&raw, &PARAMETERS[3]), 2.0);

        raw.elevation = None;
        assert_eq!(parameter_score(&raw, &PARAMETERS[3]), 2.0);
    }

    #[test]
    fn negative_ndvi_forces_zero_land_cover() {
        assert_eq!(enhanced_land_cover_score(Some(30.0), Some(-0.2)), 0.0);
        assert_eq!(enhanced_land_cover_score(Some(50.0), Some(-0.2)), 0.0);
    }

    #[test]
    fn grassland_adjustment_is_clamped_at_ten() {
        // Base 10 plus any positive adjustment still clamps to 10
        assert_eq!(enhanced_land_cover_score(Some(30.0), Some(0.4)), 10.0);
    }

    #[test]
    fn cropland_gets_ndvi_adjustment() {
        // 8 + 0.4 * 0.2 * 0.8
        let score = enhanced_land_cover_score(Some(20.0), Some(0.4));
        assert!((score - 8.064).abs() < 1e-9);
    }

    #[test]
    fn tree_cover_factor_too_low_for_adjustment() {
        assert_eq!(enhanced_land_cover_score(Some(10.0), Some(0.5)), 3.0);
    }

    #[test]
    fn flooded_classes_depend_on_ndvi() {
        assert_eq!(enhanced_land_cover_score(Some(80.0), Some(0.05)), 0.0);
        assert_eq!(enhanced_land_cover_score(Some(90.0), Some(0.2)), 2.0);
        assert_eq!(enhanced_land_cover_score(Some(50.0), Some(0.2)), 1.0);
    }

    #[test]
    fn unknown_class_is_neutral() {
        assert_eq!(enhanced_land_cover_score(Some(42.0), None), 5.0);
        assert_eq!(enhanced_land_cover_score(None, None), 5.0);
    }

    #[test]
    fn near_integer_land_cover_codes_are_rounded() {
        assert_eq!(enhanced_land_cover_score(Some(29.9999), None), 10.0);
    }

    #[test]
    fn all_null_input_scores_low_but_defined() {
        let raw = RawParameterSet::default();
        let score = final_weighted_score(&raw);
        // elevation 2 * 0.03 + landCover 5 * 0.10 + landOwnership 5 * 0.06
        assert!((score - 0.86).abs() < 1e-9);
        assert!((0.0..=10.0).contains(&score));
    }

    #[test]
    fn final_score_stays_in_bounds_for_ideal_site() {
        let raw = RawParameterSet {
            slope: Some(2.0),
            ghi: Some(6.0),
            temperature: Some(20.0),
            elevation: Some(500.0),
            land_cover: Some(30.0),
            proximity_to_lines: Some(0.5),
            proximity_to_roads: Some(0.5),
            water_availability: Some(1.0),
            soil_stability: Some(150.0),
            shading: Some(220.0),
            dust: Some(0.05),
            seismic_risk: Some(0.05),
            flood_risk: Some(0.0),
            land_ownership: Some(1.0),
            wind_speed: Some(10.0),
            ndvi: Some(0.2),
            ..Default::default()
        };
        let score = final_weighted_score(&raw);
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn breakdown_matches_final_score() {
        let raw = RawParameterSet {
            slope: Some(8.0),
            ghi: Some(5.0),
            land_cover: Some(20.0),
            ..Default::default()
        };
        let rows = score_breakdown(&raw);
        assert_eq!(rows.len(), 15);
        let total: f64 = rows.iter().map(|r| r.weighted).sum();
        assert!((total.clamp(0.0, 10.0) - final_weighted_score(&raw)).abs() < 1e-9);
    }
}
