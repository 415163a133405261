use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::shared::camera_channel::CameraChannel;
use crate::shared::captured_image::CapturedImage;

/// Captures one still image per trigger from a channel's frame source.
///
/// Stamps every image with its channel and a monotonically increasing
/// sequence number so downstream logs and hand-offs can refer to it.
pub struct FrameSampler {
    channel: CameraChannel,
    source: Box<dyn FrameSource>,
    next_sequence: u64,
}

impl FrameSampler {
    pub fn new(channel: CameraChannel, source: Box<dyn FrameSource>) -> Self {
        Self {
            channel,
            source,
            next_sequence: 0,
        }
    }

    pub fn channel(&self) -> CameraChannel {
        self.channel
    }

    /// Number of frames successfully captured so far.
    pub fn frames_captured(&self) -> u64 {
        self.next_sequence
    }

    pub fn sample(&mut self) -> Result<CapturedImage, CaptureError> {
        let data = self.source.capture()?;
        if data.is_empty() {
            return Err(CaptureError::NoFrame(format!(
                "{} camera returned an empty frame",
                self.channel
            )));
        }
        let image = CapturedImage::new(data, self.channel, self.next_sequence);
        self.next_sequence += 1;
        Ok(image)
    }
}
