use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub const ALL: [NotificationLevel; 4] = [
        NotificationLevel::Info,
        NotificationLevel::Success,
        NotificationLevel::Warning,
        NotificationLevel::Error,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Info => 0,
            Self::Success => 1,
            Self::Warning => 2,
            Self::Error => 3,
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Operator-facing notification channel (toasts, console, log).
///
/// Shared by both channel workers, so it is notified through `&self`.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, level: NotificationLevel);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotificationSink;

impl NotificationSink for NullNotificationSink {
    fn notify(&self, _message: &str, _level: NotificationLevel) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(NotificationLevel::Warning.to_string(), "warning");
        assert_eq!(NotificationLevel::Success.to_string(), "success");
    }

    #[test]
    fn test_indices_are_distinct() {
        let mut seen: Vec<usize> = NotificationLevel::ALL.iter().map(|l| l.index()).collect();
        seen.dedup();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
