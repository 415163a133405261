use serde::{Deserialize, Serialize};

/// One vehicle suggested for a client, scored 0-100 by interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedCar {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub brand: String,
    pub model: String,
    pub price: f64,
    pub year: i32,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub interest_score: f64,
}

/// Ordered list of recommendations, best first when built with [`RecommendationSet::ranked`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationSet {
    cars: Vec<RecommendedCar>,
}

impl RecommendationSet {
    /// Keeps the order given.
    pub fn new(cars: Vec<RecommendedCar>) -> Self {
        Self { cars }
    }

    /// Sorts by `interest_score`, highest first.
    pub fn ranked(mut cars: Vec<RecommendedCar>) -> Self {
        cars.sort_by(|a, b| b.interest_score.total_cmp(&a.interest_score));
        Self { cars }
    }

    pub fn cars(&self) -> &[RecommendedCar] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn top(&self) -> Option<&RecommendedCar> {
        self.cars.first()
    }
}

#[cfg(test)]
pub(crate) fn car(id: i64, interest_score: f64) -> RecommendedCar {
    RecommendedCar {
        id,
        name: format!("Car {id}"),
        brand: "Volvo".into(),
        model: "XC60".into(),
        price: 45_000.0,
        year: 2023,
        category: "suv".into(),
        image_url: None,
        interest_score,
    }
}
