use std::time::SystemTime;

use crate::shared::camera_channel::CameraChannel;

/// One still image captured from a channel's live feed.
///
/// The bytes are whatever encoding the frame source produced (usually JPEG);
/// the engine never decodes them, it only forwards them to collaborators.
#[derive(Clone, Debug)]
pub struct CapturedImage {
    data: Vec<u8>,
    channel: CameraChannel,
    sequence: u64,
    captured_at: SystemTime,
}

impl CapturedImage {
    pub fn new(data: Vec<u8>, channel: CameraChannel, sequence: u64) -> Self {
        Self {
            data,
            channel,
            sequence,
            captured_at: SystemTime::now(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn channel(&self) -> CameraChannel {
        self.channel
    }

    /// Per-channel capture counter, starting at 0.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn captured_at(&self) -> SystemTime {
        self.captured_at
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
