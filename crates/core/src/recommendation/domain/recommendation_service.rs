use thiserror::Error;

use crate::recommendation::domain::recommended_car::RecommendationSet;

#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("recommendation request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("recommendation service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed recommendation payload: {0}")]
    Malformed(String),
    #[error("recommendation service unavailable: {0}")]
    Unavailable(String),
}

/// Domain interface for fetching a recognized client's recommendations.
pub trait RecommendationService: Send + Sync {
    fn fetch(&self, identity_id: &str) -> Result<RecommendationSet, RecommendationError>;
}

/// Caller-supplied list shown when personalised recommendations are not available.
pub trait FallbackRecommendations: Send + Sync {
    /// `identity_id` is `None` for visitors without a confirmed identity.
    fn fallback_for(&self, identity_id: Option<&str>) -> RecommendationSet;
}
