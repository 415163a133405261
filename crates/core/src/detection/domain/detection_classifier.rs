use crate::detection::domain::recognition_outcome::RecognitionOutcome;
use crate::recognition::domain::raw_recognition::RawRecognition;
use crate::shared::constants::CONFIDENCE_THRESHOLD;

/// Turns a raw recognition response into a [`RecognitionOutcome`].
///
/// The threshold is applied locally even if the service already filtered
/// its matches with its own tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionClassifier {
    threshold: f64,
}

impl Default for DetectionClassifier {
    fn default() -> Self {
        Self::new(CONFIDENCE_THRESHOLD)
    }
}

impl DetectionClassifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn classify(&self, raw: &RawRecognition) -> RecognitionOutcome {
        let face_box = match (raw.has_face, raw.face_box) {
            (true, Some(face_box)) => face_box,
            _ => return RecognitionOutcome::NoFace,
        };

        let Some(identity_id) = raw.identity_id.as_ref() else {
            return RecognitionOutcome::Unregistered { face_box };
        };

        match raw.confidence.filter(|c| c.is_finite()) {
            None => RecognitionOutcome::Unregistered { face_box },
            Some(confidence) if confidence >= self.threshold => RecognitionOutcome::Recognized {
                identity_id: identity_id.clone(),
                display_name: raw
                    .display_name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| identity_id.clone()),
                confidence,
                face_box,
            },
            Some(confidence) => RecognitionOutcome::UnconfirmedMatch {
                confidence,
                face_box,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::recognition_outcome::OutcomeKind;
    use crate::shared::face_box::FaceBox;
    use rstest::rstest;

    fn face() -> FaceBox {
        FaceBox::new(100.0, 200.0, 200.0, 100.0)
    }

    #[rstest]
    #[case::at_threshold(60.0, OutcomeKind::Recognized)]
    #[case::just_below(59.999, OutcomeKind::UnconfirmedMatch)]
    #[case::well_above(97.5, OutcomeKind::Recognized)]
    #[case::zero(0.0, OutcomeKind::UnconfirmedMatch)]
    fn test_threshold_boundary(#[case] confidence: f64, #[case] expected: OutcomeKind) {
        let raw = RawRecognition::matched(face(), "7", "Grace", confidence);
        assert_eq!(DetectionClassifier::default().classify(&raw).kind(), expected);
    }

    #[test]
    fn test_low_confidence_identity_becomes_unconfirmed() {
        let raw = RawRecognition::matched(face(), "7", "Grace", 45.0);

        let outcome = DetectionClassifier::default().classify(&raw);

        assert_eq!(
            outcome,
            RecognitionOutcome::UnconfirmedMatch {
                confidence: 45.0,
                face_box: face(),
            }
        );
    }

    #[test]
    fn test_no_face() {
        let outcome = DetectionClassifier::default().classify(&RawRecognition::no_face());
        assert_eq!(outcome, RecognitionOutcome::NoFace);
    }

    #[test]
    fn test_claimed_face_without_box_is_no_face() {
        let raw = RawRecognition {
            has_face: true,
            identity_id: Some("7".into()),
            confidence: Some(90.0),
            ..RawRecognition::default()
        };
        assert_eq!(
            DetectionClassifier::default().classify(&raw),
            RecognitionOutcome::NoFace
        );
    }

    #[test]
    fn test_face_without_identity_is_unregistered() {
        let raw = RawRecognition::unknown_face(face());
        let outcome = DetectionClassifier::default().classify(&raw);
        assert_eq!(outcome, RecognitionOutcome::Unregistered { face_box: face() });
    }

    #[rstest]
    #[case::missing(None)]
    #[case::nan(Some(f64::NAN))]
    #[case::infinite(Some(f64::INFINITY))]
    fn test_identity_without_usable_confidence_is_unregistered(#[case] confidence: Option<f64>) {
        let raw = RawRecognition {
            confidence,
            identity_id: Some("7".into()),
            display_name: Some("Grace".into()),
            ..RawRecognition::unknown_face(face())
        };
        assert_eq!(
            DetectionClassifier::default().classify(&raw).kind(),
            OutcomeKind::Unregistered
        );
    }

    #[test]
    fn test_missing_display_name_falls_back_to_identity() {
        let raw = RawRecognition {
            display_name: None,
            ..RawRecognition::matched(face(), "c-12", "", 80.0)
        };
        match DetectionClassifier::default().classify(&raw) {
            RecognitionOutcome::Recognized { display_name, .. } => assert_eq!(display_name, "c-12"),
            other => panic!("expected Recognized, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_threshold() {
        let classifier = DetectionClassifier::new(80.0);
        let raw = RawRecognition::matched(face(), "7", "Grace", 75.0);
        assert_eq!(classifier.classify(&raw).kind(), OutcomeKind::UnconfirmedMatch);
    }
}
