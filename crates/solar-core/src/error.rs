//! Error taxonomy for site analysis.
//!
//! Geometry problems are client errors and are raised before any I/O.
//! A collaborator failure is critical: the suitability score is
//! meaningless without the geophysical raw parameters, so it is never
//! substituted with defaults. Infrastructure lookups never surface
//! here at all; the proximity resolvers fall back to documented
//! defaults instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The submitted geometry could not be reduced to a valid polygon.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The external geophysical-analysis collaborator failed.
    #[error("geophysical analysis failed: {0}")]
    Collaborator(String),
}

impl AnalysisError {
    /// True when the request should be rejected as a client error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalysisError::InvalidGeometry(_))
    }
}
