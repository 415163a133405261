use std::path::PathBuf;

use thiserror::Error;

use crate::registration::domain::registration_offer::RegistrationOffer;

#[derive(Error, Debug)]
pub enum HandoffError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode registration data: {0}")]
    Encode(String),
}

/// Passes an unregistered visitor's capture to whatever collects registrations.
///
/// Fire and forget: callers log a failed hand-off and move on.
pub trait RegistrationHandoff: Send + Sync {
    fn offer_registration(&self, offer: &RegistrationOffer) -> Result<(), HandoffError>;
}
