use thiserror::Error;

use crate::capture::domain::frame_source::CaptureError;
use crate::recognition::domain::recognition_service::RecognitionError;

/// Why a sampling tick produced no observation.
#[derive(Error, Debug)]
pub enum TickFailure {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}
