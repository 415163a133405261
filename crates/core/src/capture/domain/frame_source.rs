use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a frame at all, as opposed to a frame with no face in it.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("no frame available: {0}")]
    NoFrame(String),
    #[error("failed to read frame from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Domain interface for a live video feed that can be asked for its current image.
///
/// Implementations may be stateful (e.g., replaying a sequence), hence `&mut self`.
pub trait FrameSource: Send {
    /// Returns the encoded bytes of the current frame.
    fn capture(&mut self) -> Result<Vec<u8>, CaptureError>;
}
