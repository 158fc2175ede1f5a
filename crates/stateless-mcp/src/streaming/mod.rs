//! Streaming support: the notification channel and progress reporting.

pub mod channel;
pub mod progress;

pub use channel::NotificationChannel;
pub use progress::ProgressReporter;
