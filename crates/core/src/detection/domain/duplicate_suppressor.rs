use crate::detection::domain::recognition_outcome::RecognitionOutcome;
use crate::shared::constants::DEFAULT_PROXIMITY_PX;

/// Decides whether a new outcome repeats the last reported one.
///
/// Recognized clients are compared by identity. Everyone else is compared
/// by how far their face box moved, since there is no identity to go on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicateSuppressor {
    proximity_px: f64,
}

impl Default for DuplicateSuppressor {
    fn default() -> Self {
        Self::new(DEFAULT_PROXIMITY_PX)
    }
}

impl DuplicateSuppressor {
    pub fn new(proximity_px: f64) -> Self {
        Self { proximity_px }
    }

    pub fn is_same_event(
        &self,
        previous: Option<&RecognitionOutcome>,
        current: &RecognitionOutcome,
    ) -> bool {
        use RecognitionOutcome::*;

        let Some(previous) = previous else {
            return false;
        };

        match (previous, current) {
            (_, NoFace) | (NoFace, _) => false,
            (Recognized { identity_id: a, .. }, Recognized { identity_id: b, .. }) => a == b,
            (Recognized { .. }, _) | (_, Recognized { .. }) => false,
            (prev, cur) => match (prev.face_box(), cur.face_box()) {
                (Some(a), Some(b)) => a.center_distance(b) < self.proximity_px,
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::face_box::FaceBox;
    use rstest::rstest;

    fn recognized(id: &str, face_box: FaceBox) -> RecognitionOutcome {
        RecognitionOutcome::Recognized {
            identity_id: id.into(),
            display_name: format!("client {id}"),
            confidence: 90.0,
            face_box,
        }
    }

    fn unregistered(face_box: FaceBox) -> RecognitionOutcome {
        RecognitionOutcome::Unregistered { face_box }
    }

    /// 100x100 box whose center sits at (cx, 150).
    fn box_centered_at(cx: f64) -> FaceBox {
        FaceBox::new(100.0, cx + 50.0, 200.0, cx - 50.0)
    }

    #[test]
    fn test_nothing_reported_yet() {
        let suppressor = DuplicateSuppressor::default();
        assert!(!suppressor.is_same_event(None, &unregistered(box_centered_at(0.0))));
    }

    #[test]
    fn test_same_identity_regardless_of_box() {
        let suppressor = DuplicateSuppressor::default();
        let previous = recognized("7", box_centered_at(0.0));
        let current = recognized("7", box_centered_at(900.0));
        assert!(suppressor.is_same_event(Some(&previous), &current));
    }

    #[test]
    fn test_different_identity_is_new_event() {
        let suppressor = DuplicateSuppressor::default();
        let previous = recognized("7", box_centered_at(0.0));
        let current = recognized("8", box_centered_at(0.0));
        assert!(!suppressor.is_same_event(Some(&previous), &current));
    }

    #[rstest]
    #[case::shifted_20(20.0, true)]
    #[case::shifted_49_9(49.9, true)]
    #[case::shifted_exactly_50(50.0, false)]
    #[case::shifted_80(80.0, false)]
    fn test_proximity_boundary(#[case] shift: f64, #[case] duplicate: bool) {
        let suppressor = DuplicateSuppressor::default();
        let previous = unregistered(box_centered_at(300.0));
        let current = unregistered(box_centered_at(300.0 + shift));
        assert_eq!(suppressor.is_same_event(Some(&previous), &current), duplicate);
    }

    #[test]
    fn test_unconfirmed_and_unregistered_compare_by_position() {
        let suppressor = DuplicateSuppressor::default();
        let previous = RecognitionOutcome::UnconfirmedMatch {
            confidence: 45.0,
            face_box: box_centered_at(300.0),
        };
        let current = unregistered(box_centered_at(310.0));
        assert!(suppressor.is_same_event(Some(&previous), &current));
    }

    #[test]
    fn test_recognized_never_matches_unrecognized() {
        let suppressor = DuplicateSuppressor::default();
        let a = recognized("7", box_centered_at(300.0));
        let b = unregistered(box_centered_at(300.0));
        assert!(!suppressor.is_same_event(Some(&a), &b));
        assert!(!suppressor.is_same_event(Some(&b), &a));
    }

    #[test]
    fn test_no_face_is_never_a_duplicate() {
        let suppressor = DuplicateSuppressor::default();
        let previous = unregistered(box_centered_at(300.0));
        assert!(!suppressor.is_same_event(Some(&previous), &RecognitionOutcome::NoFace));
    }

    #[test]
    fn test_custom_proximity() {
        let suppressor = DuplicateSuppressor::new(10.0);
        let previous = unregistered(box_centered_at(300.0));
        let current = unregistered(box_centered_at(320.0));
        assert!(!suppressor.is_same_event(Some(&previous), &current));
    }
}
