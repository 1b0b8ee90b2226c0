use super::domain::{
    FreelancerProfile, Job, JobDraft, JobId, Notification, NotificationDraft, NotificationId,
    UserAccount, UserId,
};

/// Error enumeration shared by all collection stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Identity records keyed by username. Shared read-only with every other
/// component; only the identity service writes to it.
pub trait UserStore: Send + Sync {
    fn insert(&self, account: UserAccount) -> Result<(), StoreError>;
    fn fetch(&self, id: &UserId) -> Result<Option<UserAccount>, StoreError>;
}

/// Job records with ledger-assigned monotonic ids.
///
/// `swap` is the concurrency primitive behind `acceptJob` and
/// `confirmPayment`: it replaces the stored record only if the stored
/// revision is exactly one behind the update, all under the ledger's lock.
/// A stale base revision yields [`StoreError::Conflict`], which the services
/// translate into the lost-race errors of their own vocabulary.
pub trait JobStore: Send + Sync {
    fn append(&self, draft: JobDraft) -> Result<Job, StoreError>;
    fn fetch(&self, id: JobId) -> Result<Option<Job>, StoreError>;
    /// All jobs still open, ascending by id: posting order, oldest first.
    fn open_jobs(&self) -> Result<Vec<Job>, StoreError>;
    fn swap(&self, updated: Job) -> Result<Job, StoreError>;
}

/// Mailbox entries keyed by recipient username.
pub trait NotificationStore: Send + Sync {
    fn append(&self, draft: NotificationDraft) -> Result<Notification, StoreError>;
    fn fetch(&self, id: NotificationId) -> Result<Option<Notification>, StoreError>;
    /// The recipient's notifications, newest first (descending id).
    fn inbox(&self, recipient: &UserId) -> Result<Vec<Notification>, StoreError>;
    /// Flip `paid` to `Some(true)`. The only mutation a notification admits.
    fn mark_paid(&self, id: NotificationId) -> Result<Notification, StoreError>;
}

/// Freelancer roster in registration order.
pub trait FreelancerStore: Send + Sync {
    /// Returns `false` without touching the roster when the username is
    /// already registered.
    fn register(&self, profile: FreelancerProfile) -> Result<bool, StoreError>;
    fn all(&self) -> Result<Vec<FreelancerProfile>, StoreError>;
}
