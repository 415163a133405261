use std::time::Duration;

use thiserror::Error;

use crate::detection::domain::recognition_outcome::OutcomeKind;
use crate::shared::constants::{
    CONFIDENCE_THRESHOLD, DEFAULT_POLL_INTERVAL, DEFAULT_PROXIMITY_PX, RECOGNIZED_HOLD,
    UNCONFIRMED_HOLD,
};

/// What a channel does once its cooldown expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartPolicy {
    /// Return to `Idle` and wait for an operator `start`.
    #[default]
    Manual,
    /// Resume sampling immediately, still suppressing the last reported outcome.
    Automatic,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("confidence threshold must be between 0 and 100, got {0}")]
    ThresholdOutOfRange(f64),
    #[error("proximity distance must be positive, got {0}")]
    NonPositiveProximity(f64),
}

/// Tunables shared by every channel state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub poll_interval: Duration,
    pub recognized_hold: Duration,
    pub unconfirmed_hold: Duration,
    pub confidence_threshold: f64,
    pub proximity_px: f64,
    pub restart_policy: RestartPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            recognized_hold: RECOGNIZED_HOLD,
            unconfirmed_hold: UNCONFIRMED_HOLD,
            confidence_threshold: CONFIDENCE_THRESHOLD,
            proximity_px: DEFAULT_PROXIMITY_PX,
            restart_policy: RestartPolicy::Manual,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if !(0.0..=100.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.confidence_threshold));
        }
        if self.proximity_px.is_nan() || self.proximity_px <= 0.0 {
            return Err(ConfigError::NonPositiveProximity(self.proximity_px));
        }
        Ok(())
    }

    /// Cooldown duration for a resolved outcome of the given kind.
    pub fn hold_for(&self, kind: OutcomeKind) -> Duration {
        match kind {
            OutcomeKind::Recognized => self.recognized_hold,
            OutcomeKind::UnconfirmedMatch | OutcomeKind::Unregistered | OutcomeKind::NoFace => {
                self.unconfirmed_hold
            }
        }
    }
}
