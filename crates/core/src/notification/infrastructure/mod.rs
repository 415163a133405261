pub mod log_notification_sink;
