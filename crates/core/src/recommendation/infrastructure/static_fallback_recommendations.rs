use crate::recommendation::domain::recommendation_service::{
    FallbackRecommendations, RecommendationError,
};
use crate::recommendation::domain::recommended_car::{RecommendationSet, RecommendedCar};

/// Same ranked list for every visitor.
#[derive(Debug, Clone, Default)]
pub struct StaticFallbackRecommendations {
    set: RecommendationSet,
}

impl StaticFallbackRecommendations {
    pub fn new(cars: Vec<RecommendedCar>) -> Self {
        Self {
            set: RecommendationSet::ranked(cars),
        }
    }

    /// Loads a JSON array of cars, e.g. a showroom's featured list.
    pub fn from_json(json: &str) -> Result<Self, RecommendationError> {
        let cars: Vec<RecommendedCar> = serde_json::from_str(json)
            .map_err(|e| RecommendationError::Malformed(e.to_string()))?;
        Ok(Self::new(cars))
    }
}

impl FallbackRecommendations for StaticFallbackRecommendations {
    fn fallback_for(&self, _identity_id: Option<&str>) -> RecommendationSet {
        self.set.clone()
    }
}
