use super::domain::{JobId, UserId};

/// The closed set of events raised by the job lifecycle and the payment
/// processor. Each event fans out to exactly one notification, so the set is
/// an enum with named handlers rather than an open subscriber list.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketEvent {
    JobAccepted {
        job_id: JobId,
        client: UserId,
        freelancer: UserId,
        freelancer_contact: String,
        amount: f64,
    },
    PaymentConfirmed {
        job_id: JobId,
        client: UserId,
        freelancer: UserId,
        amount: f64,
    },
}

/// Outbound seam for event delivery, so services can be exercised against a
/// recording publisher in tests.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: MarketEvent) -> Result<(), EventError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event delivery failed: {0}")]
    Delivery(String),
}
