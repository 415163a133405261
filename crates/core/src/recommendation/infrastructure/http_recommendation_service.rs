use reqwest::blocking::Client;

use crate::recommendation::domain::recommendation_service::{
    RecommendationError, RecommendationService,
};
use crate::recommendation::domain::recommended_car::{RecommendationSet, RecommendedCar};
use crate::shared::http_service_config::HttpServiceConfig;

pub struct HttpRecommendationService {
    http: Client,
    config: HttpServiceConfig,
}

impl HttpRecommendationService {
    pub fn new(config: HttpServiceConfig) -> Result<Self, RecommendationError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RecommendationError::Transport)?;
        Ok(Self { http, config })
    }
}

impl RecommendationService for HttpRecommendationService {
    fn fetch(&self, identity_id: &str) -> Result<RecommendationSet, RecommendationError> {
        let url = self
            .config
            .endpoint(&format!("face/recommendations/{identity_id}"));

        let response = self
            .http
            .post(&url)
            .send()
            .map_err(RecommendationError::Transport)?;

        let status = response.status();
        let body = response.text().map_err(RecommendationError::Transport)?;
        if !status.is_success() {
            return Err(RecommendationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_recommendations(&body)
    }
}

/// Parses the JSON car list and ranks it by interest.
pub fn parse_recommendations(body: &str) -> Result<RecommendationSet, RecommendationError> {
    let cars: Vec<RecommendedCar> =
        serde_json::from_str(body).map_err(|e| RecommendationError::Malformed(e.to_string()))?;
    Ok(RecommendationSet::ranked(cars))
}
