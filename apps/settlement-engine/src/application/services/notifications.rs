//! Fire-and-forget notification dispatch.
//!
//! Events drained from committed aggregates are turned into messages for the
//! broker and customer and sent on a spawned task. Failures are logged and
//! counted; they never reach the caller.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::ports::{NotificationPort, UserDirectoryPort};
use crate::domain::commission::CommissionEvent;
use crate::domain::shared::UserId;
use crate::domain::transaction::TransactionEvent;
use crate::observability::record_notification_failure;

/// A message addressed to a user, resolved to an email at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Recipient.
    pub to: UserId,
    /// Event type that produced the message.
    pub kind: &'static str,
    /// Subject line.
    pub subject: String,
    /// Body.
    pub body: String,
}

impl OutboundMessage {
    /// Messages for a commission event.
    #[must_use]
    pub fn for_commission(event: &CommissionEvent) -> Vec<Self> {
        let kind = event.event_type();
        match event {
            CommissionEvent::Created {
                commission_id,
                broker_id,
                customer_id,
                commission_amount,
                ..
            } => {
                let subject = format!("Commission {commission_id} created");
                let body = format!(
                    "A commission of {commission_amount} was recorded and is pending."
                );
                vec![
                    Self::new(broker_id, kind, &subject, &body),
                    Self::new(customer_id, kind, &subject, &body),
                ]
            }
            CommissionEvent::StatusChanged {
                commission_id,
                broker_id,
                customer_id,
                from,
                to,
                ..
            } => {
                let subject = format!("Commission {commission_id} is now {to}");
                let body = format!("Commission {commission_id} moved from {from} to {to}.");
                vec![
                    Self::new(broker_id, kind, &subject, &body),
                    Self::new(customer_id, kind, &subject, &body),
                ]
            }
        }
    }

    /// Messages for a transaction event.
    #[must_use]
    pub fn for_transaction(event: &TransactionEvent) -> Vec<Self> {
        let kind = event.event_type();
        match event {
            TransactionEvent::Created {
                transaction_id,
                transaction_type,
                user_id,
                broker_id,
                total_transaction_value,
                ..
            } => {
                let subject = format!("New {transaction_type} request {transaction_id}");
                let body = format!(
                    "A {transaction_type} request worth {total_transaction_value} awaits your approval."
                );
                let receipt = format!(
                    "Your {transaction_type} request worth {total_transaction_value} was submitted."
                );
                vec![
                    Self::new(broker_id, kind, &subject, &body),
                    Self::new(user_id, kind, &subject, &receipt),
                ]
            }
            TransactionEvent::StatusChanged {
                transaction_id,
                user_id,
                broker_id,
                from,
                to,
                ..
            } => {
                let subject = format!("Transaction {transaction_id} is now {to}");
                let body = format!("Transaction {transaction_id} moved from {from} to {to}.");
                vec![
                    Self::new(user_id, kind, &subject, &body),
                    Self::new(broker_id, kind, &subject, &body),
                ]
            }
            TransactionEvent::PaymentProofUploaded {
                transaction_id,
                broker_id,
                proof_url,
                ..
            } => vec![Self::new(
                broker_id,
                kind,
                &format!("Payment proof for {transaction_id}"),
                &format!("The customer uploaded a payment proof: {proof_url}"),
            )],
        }
    }

    fn new(to: &UserId, kind: &'static str, subject: &str, body: &str) -> Self {
        Self {
            to: to.clone(),
            kind,
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }
}

/// Sends notifications without blocking the caller.
pub struct NotificationDispatcher<U, N>
where
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
{
    users: Arc<U>,
    notifier: Arc<N>,
}

impl<U, N> Clone for NotificationDispatcher<U, N>
where
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<U, N> NotificationDispatcher<U, N>
where
    U: UserDirectoryPort + 'static,
    N: NotificationPort + 'static,
{
    /// Create a dispatcher.
    pub const fn new(users: Arc<U>, notifier: Arc<N>) -> Self {
        Self { users, notifier }
    }

    /// Dispatch messages for committed commission events.
    pub fn commission_events(&self, events: &[CommissionEvent]) {
        self.spawn(events.iter().flat_map(OutboundMessage::for_commission).collect());
    }

    /// Dispatch messages for committed transaction events.
    pub fn transaction_events(&self, events: &[TransactionEvent]) {
        self.spawn(
            events
                .iter()
                .flat_map(OutboundMessage::for_transaction)
                .collect(),
        );
    }

    fn spawn(&self, messages: Vec<OutboundMessage>) {
        if messages.is_empty() {
            return;
        }
        let users = Arc::clone(&self.users);
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            for message in messages {
                deliver(users.as_ref(), notifier.as_ref(), &message).await;
            }
        });
    }
}

async fn deliver<U, N>(users: &U, notifier: &N, message: &OutboundMessage)
where
    U: UserDirectoryPort,
    N: NotificationPort,
{
    let email = match users.find_user_by_id(&message.to).await {
        Ok(Some(user)) => user.email,
        Ok(None) => {
            warn!(user_id = %message.to, kind = message.kind, "Notification recipient not found");
            record_notification_failure(message.kind);
            return;
        }
        Err(e) => {
            warn!(user_id = %message.to, kind = message.kind, error = %e, "Recipient lookup failed");
            record_notification_failure(message.kind);
            return;
        }
    };

    match notifier.send(&email, &message.subject, &message.body).await {
        Ok(()) => debug!(to = %email, kind = message.kind, "Notification sent"),
        Err(e) => {
            warn!(to = %email, kind = message.kind, error = %e, "Notification failed");
            record_notification_failure(message.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{CommissionId, Money, Timestamp};
    use crate::domain::commission::CommissionStatus;

    #[test]
    fn commission_status_change_notifies_both_parties() {
        let event = CommissionEvent::StatusChanged {
            commission_id: CommissionId::new("c-1"),
            broker_id: UserId::new("broker"),
            customer_id: UserId::new("client"),
            from: CommissionStatus::Pending,
            to: CommissionStatus::Completed,
            occurred_at: Timestamp::now(),
        };
        let messages = OutboundMessage::for_commission(&event);
        let recipients: Vec<_> = messages.iter().map(|m| m.to.as_str()).collect();
        assert_eq!(recipients, vec!["broker", "client"]);
        assert_eq!(messages[0].subject, "Commission c-1 is now completed");
    }

    #[test]
    fn created_commission_mentions_amount() {
        let event = CommissionEvent::Created {
            commission_id: CommissionId::new("c-2"),
            broker_id: UserId::new("broker"),
            customer_id: UserId::new("client"),
            commission_amount: Money::from_units(150),
            occurred_at: Timestamp::now(),
        };
        let messages = OutboundMessage::for_commission(&event);
        assert!(messages[0].body.contains("150.00"));
    }
}
