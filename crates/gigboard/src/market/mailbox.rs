use std::sync::Arc;

use chrono::Utc;

use super::domain::{round_to_cents, Notification, NotificationDraft, NotificationId, UserId};
use super::events::{EventError, EventPublisher, MarketEvent};
use super::store::{NotificationStore, StoreError};

/// Per-user ordered notification inbox.
///
/// The mailbox is the sole owner of notification records: events append,
/// `settle` flips the paid flag, and nothing else mutates. Recipients are
/// matched on the username key only.
pub struct MailboxService<N> {
    notifications: Arc<N>,
}

#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    #[error("notification {0} not found")]
    NotFound(NotificationId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<N> MailboxService<N>
where
    N: NotificationStore,
{
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }

    /// The recipient's notifications, newest first. Read-only.
    pub fn inbox(&self, recipient: &UserId) -> Result<Vec<Notification>, MailboxError> {
        Ok(self.notifications.inbox(recipient)?)
    }

    pub fn fetch(&self, id: NotificationId) -> Result<Option<Notification>, MailboxError> {
        Ok(self.notifications.fetch(id)?)
    }

    /// Mark an actionable notification as paid.
    pub fn settle(&self, id: NotificationId) -> Result<Notification, MailboxError> {
        match self.notifications.mark_paid(id) {
            Ok(entry) => Ok(entry),
            Err(StoreError::NotFound) => Err(MailboxError::NotFound(id)),
            Err(other) => Err(other.into()),
        }
    }
}

impl<N> EventPublisher for MailboxService<N>
where
    N: NotificationStore,
{
    fn publish(&self, event: MarketEvent) -> Result<(), EventError> {
        let draft = match event {
            MarketEvent::JobAccepted {
                job_id,
                client,
                freelancer,
                freelancer_contact,
                amount,
            } => NotificationDraft {
                recipient: client,
                title: "Job Accepted!".to_string(),
                body: format!(
                    "{freelancer} accepted your job #{job_id}. Contact: {freelancer_contact}. \
                     Release the payment once the work is delivered."
                ),
                actionable: true,
                job_id,
                amount: Some(amount),
                paid: Some(false),
                created_at: Utc::now(),
            },
            MarketEvent::PaymentConfirmed {
                job_id,
                freelancer,
                amount,
                ..
            } => NotificationDraft {
                recipient: freelancer,
                title: "Payment Received".to_string(),
                body: format!(
                    "Payment of ${:.2} for job #{job_id} has been confirmed.",
                    round_to_cents(amount)
                ),
                actionable: false,
                job_id,
                amount: Some(amount),
                paid: None,
                created_at: Utc::now(),
            },
        };

        self.notifications
            .append(draft)
            .map(|_| ())
            .map_err(|err| EventError::Delivery(err.to_string()))
    }
}
