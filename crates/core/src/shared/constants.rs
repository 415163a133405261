use std::time::Duration;

/// Minimum match confidence (0-100 scale) for a face to count as a known client.
pub const CONFIDENCE_THRESHOLD: f64 = 60.0;

/// Box-center distance (pixels) under which two unidentified faces are the same visitor.
pub const DEFAULT_PROXIMITY_PX: f64 = 50.0;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// How long a confirmed recognition stays on screen before the channel resets.
pub const RECOGNIZED_HOLD: Duration = Duration::from_secs(10);

/// How long an unconfirmed or unregistered result stays on screen.
pub const UNCONFIRMED_HOLD: Duration = Duration::from_secs(5);

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_SERVICE_TIMEOUT: Duration = Duration::from_secs(10);

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];
