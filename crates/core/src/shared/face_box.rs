use serde::{Deserialize, Serialize};

/// Face bounding box in image pixel space, edges ordered as the recognition
/// service reports them: `[top, right, bottom, left]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl FaceBox {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn from_location(location: [f64; 4]) -> Self {
        let [top, right, bottom, left] = location;
        Self::new(top, right, bottom, left)
    }

    pub fn to_location(&self) -> [f64; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    pub fn width(&self) -> f64 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).abs()
    }

    /// Midpoint of the horizontal and vertical extents.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Euclidean distance between the two box centers.
    pub fn center_distance(&self, other: &FaceBox) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        (ax - bx).hypot(ay - by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_location_uses_top_right_bottom_left_order() {
        let b = FaceBox::from_location([10.0, 110.0, 120.0, 20.0]);
        assert_relative_eq!(b.top, 10.0);
        assert_relative_eq!(b.right, 110.0);
        assert_relative_eq!(b.bottom, 120.0);
        assert_relative_eq!(b.left, 20.0);
        assert_eq!(b.to_location(), [10.0, 110.0, 120.0, 20.0]);
    }

    #[test]
    fn test_center_is_midpoint_of_extents() {
        let b = FaceBox::new(10.0, 110.0, 110.0, 10.0);
        let (x, y) = b.center();
        assert_relative_eq!(x, 60.0);
        assert_relative_eq!(y, 60.0);
    }

    #[test]
    fn test_dimensions() {
        let b = FaceBox::new(20.0, 90.0, 100.0, 30.0);
        assert_relative_eq!(b.width(), 60.0);
        assert_relative_eq!(b.height(), 80.0);
    }

    #[test]
    fn test_center_distance_pythagorean() {
        // Centers (60, 60) and (90, 100): dx=30, dy=40 → 50
        let a = FaceBox::new(10.0, 110.0, 110.0, 10.0);
        let b = FaceBox::new(50.0, 140.0, 150.0, 40.0);
        assert_relative_eq!(a.center_distance(&b), 50.0);
        assert_relative_eq!(b.center_distance(&a), 50.0);
    }

    #[test]
    fn test_center_distance_to_self_is_zero() {
        let a = FaceBox::new(0.0, 40.0, 40.0, 0.0);
        assert_relative_eq!(a.center_distance(&a), 0.0);
    }
}
