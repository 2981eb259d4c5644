//! Notification adapters.

mod logging;
mod recording;

pub use logging::LoggingNotifier;
pub use recording::{RecordingNotifier, SentNotification};
