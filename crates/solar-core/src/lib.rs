pub mod error;
pub mod geometry;
pub mod models;
pub mod scoring;

pub use error::AnalysisError;
pub use geometry::{haversine_distance_km, nearest_element, NearestHit};
pub use models::{
    InfrastructureElement, NearestPowerLine, PowerLineProximity, RawParameterSet, SiteAnalysis,
    SitePolygon,
};
pub use scoring::{
    calculate_score, enhanced_land_cover_score, final_weighted_score, score_breakdown,
    validate_weight_table, ParameterKey, ParameterScore, ScoringParameter,
};
