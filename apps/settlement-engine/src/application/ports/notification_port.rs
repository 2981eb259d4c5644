//! Notification Port (Driven Port)
//!
//! Outbound email-style notifications. Delivery is best-effort.

use async_trait::async_trait;

/// Notification delivery error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationError {
    /// Transport rejected or dropped the message.
    #[error("Notification delivery failed: {message}")]
    DeliveryFailed {
        /// Transport error text.
        message: String,
    },
}

/// Port for sending notifications.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Send a message to `to`.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError>;
}

/// Notifier that drops every message.
#[derive(Debug, Clone, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl NotificationPort for NoOpNotifier {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), NotificationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_op_notifier_succeeds() {
        let notifier = NoOpNotifier;
        assert!(notifier.send("a@example.com", "s", "b").await.is_ok());
    }
}
