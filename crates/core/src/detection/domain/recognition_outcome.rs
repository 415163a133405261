use crate::shared::face_box::FaceBox;

/// Discriminant of [`RecognitionOutcome`], used for hold durations and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Recognized,
    UnconfirmedMatch,
    Unregistered,
    NoFace,
}

/// Classified result of one recognition call.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    /// A registered client matched at or above the confidence threshold.
    Recognized {
        identity_id: String,
        display_name: String,
        confidence: f64,
        face_box: FaceBox,
    },
    /// A face matched someone, but below the threshold.
    UnconfirmedMatch { confidence: f64, face_box: FaceBox },
    /// A face with no usable identity behind it.
    Unregistered { face_box: FaceBox },
    NoFace,
}

impl RecognitionOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Recognized { .. } => OutcomeKind::Recognized,
            Self::UnconfirmedMatch { .. } => OutcomeKind::UnconfirmedMatch,
            Self::Unregistered { .. } => OutcomeKind::Unregistered,
            Self::NoFace => OutcomeKind::NoFace,
        }
    }

    pub fn face_box(&self) -> Option<&FaceBox> {
        match self {
            Self::Recognized { face_box, .. }
            | Self::UnconfirmedMatch { face_box, .. }
            | Self::Unregistered { face_box } => Some(face_box),
            Self::NoFace => None,
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            Self::Recognized { confidence, .. } | Self::UnconfirmedMatch { confidence, .. } => {
                Some(*confidence)
            }
            Self::Unregistered { .. } | Self::NoFace => None,
        }
    }

    pub fn identity_id(&self) -> Option<&str> {
        match self {
            Self::Recognized { identity_id, .. } => Some(identity_id),
            _ => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Recognized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face() -> FaceBox {
        FaceBox::new(0.0, 10.0, 10.0, 0.0)
    }

    #[test]
    fn test_accessors_for_recognized() {
        let outcome = RecognitionOutcome::Recognized {
            identity_id: "7".into(),
            display_name: "Grace".into(),
            confidence: 88.0,
            face_box: face(),
        };
        assert_eq!(outcome.kind(), OutcomeKind::Recognized);
        assert_eq!(outcome.identity_id(), Some("7"));
        assert_eq!(outcome.confidence(), Some(88.0));
        assert!(outcome.face_box().is_some());
        assert!(outcome.is_recognized());
    }

    #[test]
    fn test_no_face_has_no_data() {
        let outcome = RecognitionOutcome::NoFace;
        assert_eq!(outcome.kind(), OutcomeKind::NoFace);
        assert!(outcome.face_box().is_none());
        assert!(outcome.confidence().is_none());
        assert!(outcome.identity_id().is_none());
    }

    #[test]
    fn test_unconfirmed_hides_identity() {
        let outcome = RecognitionOutcome::UnconfirmedMatch {
            confidence: 45.0,
            face_box: face(),
        };
        assert!(outcome.identity_id().is_none());
        assert!(!outcome.is_recognized());
    }
}
