use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::info;

use super::domain::{
    IntentId, JobId, JobStatus, NotificationId, PaymentIntent, PaymentOutcome, PaymentReceipt,
};
use super::events::{EventError, EventPublisher, MarketEvent};
use super::mailbox::{MailboxError, MailboxService};
use super::store::{JobStore, NotificationStore, StoreError};

/// Simulated payment confirmation for accepted jobs.
///
/// Intents are ephemeral: they live in an in-process registry and are never
/// persisted, since the durable layout is exactly the four record
/// collections. A restart drops unconfirmed intents and the caller requests
/// a fresh one.
pub struct PaymentProcessor<J, N> {
    jobs: Arc<J>,
    mailbox: Arc<MailboxService<N>>,
    intents: Mutex<HashMap<u64, PaymentIntent>>,
    sequence: AtomicU64,
}

/// Error raised by the payment flow.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("notification {0} not found")]
    UnknownNotification(NotificationId),
    #[error("notification {0} does not request a payment")]
    NotPayable(NotificationId),
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("job {0} is not awaiting payment")]
    JobNotAccepted(JobId),
    #[error("payment intent {0} not found")]
    UnknownIntent(IntentId),
    #[error(transparent)]
    Mailbox(#[from] MailboxError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Event(#[from] EventError),
}

impl<J, N> PaymentProcessor<J, N>
where
    J: JobStore,
    N: NotificationStore,
{
    pub fn new(jobs: Arc<J>, mailbox: Arc<MailboxService<N>>) -> Self {
        Self {
            jobs,
            mailbox,
            intents: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
        }
    }

    /// Open a payment intent for a pending actionable notification.
    ///
    /// The underlying job must still be awaiting payment: a settled
    /// notification or a job outside the Accepted state both surface as
    /// [`PaymentError::JobNotAccepted`].
    pub fn request_payment(
        &self,
        notification_id: NotificationId,
    ) -> Result<PaymentIntent, PaymentError> {
        let notification = self
            .mailbox
            .fetch(notification_id)?
            .ok_or(PaymentError::UnknownNotification(notification_id))?;
        if !notification.actionable {
            return Err(PaymentError::NotPayable(notification_id));
        }
        if notification.paid == Some(true) {
            return Err(PaymentError::JobNotAccepted(notification.job_id));
        }

        let job = self
            .jobs
            .fetch(notification.job_id)?
            .ok_or(PaymentError::JobNotFound(notification.job_id))?;
        if job.status != JobStatus::Accepted {
            return Err(PaymentError::JobNotAccepted(job.id));
        }
        let Some(freelancer) = job.accepted_by.clone() else {
            return Err(PaymentError::JobNotAccepted(job.id));
        };

        let intent = PaymentIntent {
            id: IntentId(self.sequence.fetch_add(1, Ordering::Relaxed)),
            job_id: job.id,
            notification_id,
            client: job.posted_by.clone(),
            freelancer,
            amount: notification.amount.unwrap_or(job.price),
        };

        self.intents
            .lock()
            .expect("payment intent mutex poisoned")
            .insert(intent.id.0, intent.clone());

        Ok(intent)
    }

    /// Confirm an intent. Idempotent and at-most-once-effective: the first
    /// confirmation wins the job's revision swap, settles the originating
    /// notification, and emits exactly one `PaymentConfirmed` event. Any
    /// repeat or race-losing call observes the Paid status and reports
    /// [`PaymentOutcome::AlreadySettled`] without touching state.
    pub fn confirm_payment(&self, intent_id: IntentId) -> Result<PaymentReceipt, PaymentError> {
        let intent = self
            .intents
            .lock()
            .expect("payment intent mutex poisoned")
            .get(&intent_id.0)
            .cloned()
            .ok_or(PaymentError::UnknownIntent(intent_id))?;

        let job = self
            .jobs
            .fetch(intent.job_id)?
            .ok_or(PaymentError::JobNotFound(intent.job_id))?;
        match job.status {
            JobStatus::Paid => {
                return Ok(PaymentReceipt {
                    intent_id,
                    job_id: job.id,
                    amount: intent.amount,
                    outcome: PaymentOutcome::AlreadySettled,
                })
            }
            JobStatus::Open => return Err(PaymentError::JobNotAccepted(job.id)),
            JobStatus::Accepted => {}
        }
        let Some(freelancer) = job.accepted_by.clone() else {
            return Err(PaymentError::JobNotAccepted(job.id));
        };

        let mut updated = job;
        updated.revision += 1;
        updated.status = JobStatus::Paid;

        let settled = match self.jobs.swap(updated) {
            Ok(job) => job,
            Err(StoreError::Conflict) => {
                // Lost the race; the winner settles the notification and
                // notifies the freelancer.
                let current = self
                    .jobs
                    .fetch(intent.job_id)?
                    .ok_or(PaymentError::JobNotFound(intent.job_id))?;
                return if current.status == JobStatus::Paid {
                    Ok(PaymentReceipt {
                        intent_id,
                        job_id: current.id,
                        amount: intent.amount,
                        outcome: PaymentOutcome::AlreadySettled,
                    })
                } else {
                    Err(PaymentError::JobNotAccepted(intent.job_id))
                };
            }
            Err(StoreError::NotFound) => return Err(PaymentError::JobNotFound(intent.job_id)),
            Err(other) => return Err(other.into()),
        };

        self.mailbox.settle(intent.notification_id)?;
        self.mailbox.publish(MarketEvent::PaymentConfirmed {
            job_id: settled.id,
            client: intent.client.clone(),
            freelancer,
            amount: intent.amount,
        })?;

        info!(job = %settled.id, intent = %intent_id, "payment confirmed");
        Ok(PaymentReceipt {
            intent_id,
            job_id: settled.id,
            amount: intent.amount,
            outcome: PaymentOutcome::Settled,
        })
    }
}
