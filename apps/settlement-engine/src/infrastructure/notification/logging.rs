//! Notifier that writes messages to the log.

use async_trait::async_trait;
use tracing::info;

use crate::application::ports::{NotificationError, NotificationPort};

/// Logs every message at `info` instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl NotificationPort for LoggingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        info!(to, subject, body, "notification");
        Ok(())
    }
}
