pub mod http_recommendation_service;
pub mod static_fallback_recommendations;
