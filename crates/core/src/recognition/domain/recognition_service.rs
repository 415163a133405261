use thiserror::Error;

use crate::recognition::domain::raw_recognition::RawRecognition;
use crate::shared::captured_image::CapturedImage;

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("recognition request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("recognition service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed recognition payload: {0}")]
    Malformed(String),
    #[error("recognition service unavailable: {0}")]
    Unavailable(String),
}

/// Domain interface for the external face recognition service.
///
/// Called concurrently from both channel workers, hence `Sync` and `&self`.
pub trait RecognitionService: Send + Sync {
    fn recognize(&self, image: &CapturedImage) -> Result<RawRecognition, RecognitionError>;
}
