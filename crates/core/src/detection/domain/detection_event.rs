use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::detection::domain::recognition_outcome::RecognitionOutcome;
use crate::shared::camera_channel::CameraChannel;
use crate::shared::captured_image::CapturedImage;

static NEXT_EVENT_ID: AtomicU64 = AtomicU64::new(1);

/// A reported detection: at most one per physical occurrence per channel.
#[derive(Debug, Clone)]
pub struct DetectionEvent {
    pub id: u64,
    pub channel: CameraChannel,
    pub outcome: RecognitionOutcome,
    pub timestamp: SystemTime,
    /// Frame the outcome was computed from, kept for registration pre-fill.
    pub image: Arc<CapturedImage>,
}

impl DetectionEvent {
    pub fn new(
        channel: CameraChannel,
        outcome: RecognitionOutcome,
        image: Arc<CapturedImage>,
    ) -> Self {
        Self {
            id: NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed),
            channel,
            outcome,
            timestamp: SystemTime::now(),
            image,
        }
    }
}
