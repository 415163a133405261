use std::sync::atomic::{AtomicUsize, Ordering};

use crate::notification::domain::notification_sink::{NotificationLevel, NotificationSink};

/// Writes notifications to the `log` facade and counts them per level.
#[derive(Debug, Default)]
pub struct LogNotificationSink {
    counts: [AtomicUsize; 4],
}

impl LogNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.counts[level.index()].load(Ordering::Relaxed)
    }
}

impl NotificationSink for LogNotificationSink {
    fn notify(&self, message: &str, level: NotificationLevel) {
        self.counts[level.index()].fetch_add(1, Ordering::Relaxed);
        match level {
            NotificationLevel::Info | NotificationLevel::Success => log::info!("{message}"),
            NotificationLevel::Warning => log::warn!("{message}"),
            NotificationLevel::Error => log::error!("{message}"),
        }
    }
}
