use crate::shared::face_box::FaceBox;

/// Unclassified answer from the recognition service for one frame.
///
/// `confidence` is on a 0-100 scale and only meaningful when an identity is
/// present. No threshold has been applied locally yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecognition {
    pub has_face: bool,
    pub face_box: Option<FaceBox>,
    pub identity_id: Option<String>,
    pub display_name: Option<String>,
    pub confidence: Option<f64>,
}

impl RawRecognition {
    pub fn no_face() -> Self {
        Self::default()
    }

    pub fn unknown_face(face_box: FaceBox) -> Self {
        Self {
            has_face: true,
            face_box: Some(face_box),
            ..Self::default()
        }
    }

    pub fn matched(
        face_box: FaceBox,
        identity_id: impl Into<String>,
        display_name: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            has_face: true,
            face_box: Some(face_box),
            identity_id: Some(identity_id.into()),
            display_name: Some(display_name.into()),
            confidence: Some(confidence),
        }
    }
}
