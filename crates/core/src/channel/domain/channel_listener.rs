use crate::channel::domain::channel_state::ChannelState;
use crate::channel::domain::tick_failure::TickFailure;
use crate::detection::domain::detection_event::DetectionEvent;
use crate::shared::camera_channel::CameraChannel;

/// Receives everything a channel worker reports.
///
/// Called from the worker thread of each channel, possibly concurrently.
/// Implementations must not block for long: the next tick waits on them.
pub trait ChannelListener: Send + Sync {
    fn on_state_changed(&self, channel: CameraChannel, state: ChannelState);
    fn on_detection(&self, event: &DetectionEvent);
    fn on_tick_failed(&self, channel: CameraChannel, failure: &TickFailure);
    fn on_cooldown_elapsed(&self, channel: CameraChannel);
}
