use std::sync::Arc;
use std::time::Instant;

use crate::recognition::domain::raw_recognition::RawRecognition;
use crate::recognition::domain::recognition_service::{RecognitionError, RecognitionService};
use crate::shared::captured_image::CapturedImage;

/// Request/response wrapper around a [`RecognitionService`].
///
/// Rejects payloads whose confidence is outside 0-100 so the classifier
/// only ever sees well-formed numbers, and logs per-call latency.
#[derive(Clone)]
pub struct RecognitionClient {
    service: Arc<dyn RecognitionService>,
}

impl RecognitionClient {
    pub fn new(service: Arc<dyn RecognitionService>) -> Self {
        Self { service }
    }

    pub fn recognize(&self, image: &CapturedImage) -> Result<RawRecognition, RecognitionError> {
        let started = Instant::now();
        let raw = self.service.recognize(image)?;
        log::debug!(
            "{} frame #{} recognized in {:.0}ms (face: {}, identity: {:?})",
            image.channel(),
            image.sequence(),
            started.elapsed().as_secs_f64() * 1000.0,
            raw.has_face,
            raw.identity_id
        );
        validate(&raw)?;
        Ok(raw)
    }
}

fn validate(raw: &RawRecognition) -> Result<(), RecognitionError> {
    if let Some(confidence) = raw.confidence {
        if !(0.0..=100.0).contains(&confidence) {
            return Err(RecognitionError::Malformed(format!(
                "confidence {confidence} is outside 0-100"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::camera_channel::CameraChannel;
    use crate::shared::face_box::FaceBox;

    struct FixedService {
        response: fn() -> Result<RawRecognition, RecognitionError>,
    }

    impl RecognitionService for FixedService {
        fn recognize(&self, _image: &CapturedImage) -> Result<RawRecognition, RecognitionError> {
            (self.response)()
        }
    }

    fn client(response: fn() -> Result<RawRecognition, RecognitionError>) -> RecognitionClient {
        RecognitionClient::new(Arc::new(FixedService { response }))
    }

    fn image() -> CapturedImage {
        CapturedImage::new(vec![0xFF, 0xD8], CameraChannel::Entry, 0)
    }

    fn face() -> FaceBox {
        FaceBox::new(10.0, 110.0, 110.0, 10.0)
    }

    #[test]
    fn test_passes_through_valid_response() {
        let c = client(|| Ok(RawRecognition::matched(face(), "42", "Ada Lovelace", 75.0)));
        let raw = c.recognize(&image()).unwrap();
        assert_eq!(raw.identity_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_propagates_service_error() {
        let c = client(|| Err(RecognitionError::Unavailable("down".into())));
        assert!(matches!(
            c.recognize(&image()),
            Err(RecognitionError::Unavailable(_))
        ));
    }

    #[test]
    fn test_rejects_confidence_above_100() {
        let c = client(|| Ok(RawRecognition::matched(face(), "1", "A", 140.0)));
        assert!(matches!(
            c.recognize(&image()),
            Err(RecognitionError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_nan_confidence() {
        let c = client(|| Ok(RawRecognition::matched(face(), "1", "A", f64::NAN)));
        assert!(c.recognize(&image()).is_err());
    }

    #[test]
    fn test_missing_confidence_is_not_malformed() {
        let c = client(|| {
            Ok(RawRecognition {
                identity_id: Some("1".into()),
                ..RawRecognition::unknown_face(face())
            })
        });
        assert!(c.recognize(&image()).is_ok());
    }
}
