use std::sync::Arc;
use std::time::SystemTime;

use crate::shared::camera_channel::CameraChannel;
use crate::shared::captured_image::CapturedImage;
use crate::shared::face_box::FaceBox;

/// Data handed to the registration flow for an unregistered visitor.
#[derive(Debug, Clone)]
pub struct RegistrationOffer {
    pub channel: CameraChannel,
    pub event_id: u64,
    pub image: Arc<CapturedImage>,
    pub face_box: FaceBox,
    pub detected_at: SystemTime,
}
