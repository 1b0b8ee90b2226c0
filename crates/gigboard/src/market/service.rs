use std::path::Path;
use std::sync::Arc;

use super::directory::{DirectoryError, FreelancerDirectory};
use super::domain::{
    FreelancerProfile, IntentId, Job, JobId, NewUser, Notification, NotificationId, PaymentIntent,
    PaymentReceipt, ServiceCategory, UserId,
};
use super::identity::{IdentityError, IdentityService};
use super::jobs::{JobError, JobService};
use super::ledger::{FreelancerLedger, JobLedger, NotificationLedger, UserLedger};
use super::mailbox::{MailboxError, MailboxService};
use super::payment::{PaymentError, PaymentProcessor};
use super::pricing::{self, PricingError};
use super::store::{FreelancerStore, JobStore, NotificationStore, StoreError, UserStore};

/// Composition root for the marketplace core: one set of ledgers wired into
/// identity, job lifecycle, mailbox, payment, and directory services. This is
/// the boundary the presentation layer talks to.
pub struct Marketplace<U, J, N, F> {
    identity: IdentityService<U, F>,
    jobs: JobService<U, J, MailboxService<N>>,
    payments: PaymentProcessor<J, N>,
    mailbox: Arc<MailboxService<N>>,
    directory: Arc<FreelancerDirectory<F>>,
}

/// Umbrella over the component errors, for callers that thread the whole
/// boundary through one `?` chain (the CLI demo does).
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Job(#[from] JobError),
    #[error(transparent)]
    Mailbox(#[from] MailboxError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<U, J, N, F> Marketplace<U, J, N, F>
where
    U: UserStore,
    J: JobStore,
    N: NotificationStore,
    F: FreelancerStore,
{
    pub fn new(users: Arc<U>, jobs: Arc<J>, notifications: Arc<N>, freelancers: Arc<F>) -> Self {
        let mailbox = Arc::new(MailboxService::new(notifications));
        let directory = Arc::new(FreelancerDirectory::new(freelancers));
        Self {
            identity: IdentityService::new(users.clone(), directory.clone()),
            jobs: JobService::new(users, jobs.clone(), mailbox.clone()),
            payments: PaymentProcessor::new(jobs, mailbox.clone()),
            mailbox,
            directory,
        }
    }

    /// Pure price computation; nothing is stored.
    pub fn quote_price(
        &self,
        service_label: &str,
        complexity_label: &str,
        hours: f64,
    ) -> Result<f64, PricingError> {
        let service = ServiceCategory::from_label(service_label);
        let complexity = pricing::parse_complexity(complexity_label)?;
        pricing::quote(service, complexity, hours)
    }

    pub fn post_job(
        &self,
        client: &UserId,
        service_label: &str,
        complexity_label: &str,
        hours: f64,
        description: &str,
    ) -> Result<Job, JobError> {
        self.jobs
            .post_job(client, service_label, complexity_label, hours, description)
    }

    pub fn list_open_jobs(&self) -> Result<Vec<Job>, JobError> {
        self.jobs.open_jobs()
    }

    pub fn fetch_job(&self, id: JobId) -> Result<Option<Job>, JobError> {
        self.jobs.fetch(id)
    }

    pub fn accept_job(&self, id: JobId, freelancer: &UserId) -> Result<Job, JobError> {
        self.jobs.accept_job(id, freelancer)
    }

    pub fn inbox(&self, user: &UserId) -> Result<Vec<Notification>, MailboxError> {
        self.mailbox.inbox(user)
    }

    pub fn request_payment(&self, id: NotificationId) -> Result<PaymentIntent, PaymentError> {
        self.payments.request_payment(id)
    }

    pub fn confirm_payment(&self, id: IntentId) -> Result<PaymentReceipt, PaymentError> {
        self.payments.confirm_payment(id)
    }

    pub fn search_freelancers(&self, term: &str) -> Result<Vec<FreelancerProfile>, DirectoryError> {
        self.directory.search(term)
    }

    pub fn register_user(&self, signup: NewUser) -> Result<UserId, IdentityError> {
        self.identity.register_user(signup)
    }

    pub fn authenticate(&self, username: &str, secret: &str) -> Result<UserId, IdentityError> {
        self.identity.authenticate(username, secret)
    }
}

/// The marketplace over the stock ledgers.
pub type LedgerMarketplace = Marketplace<UserLedger, JobLedger, NotificationLedger, FreelancerLedger>;

impl LedgerMarketplace {
    /// Volatile marketplace for tests and demos.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(UserLedger::in_memory()),
            Arc::new(JobLedger::in_memory()),
            Arc::new(NotificationLedger::in_memory()),
            Arc::new(FreelancerLedger::in_memory()),
        )
    }

    /// Marketplace over JSON snapshots in `dir`, loading whatever state a
    /// previous run left there.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(
            Arc::new(UserLedger::open(dir)?),
            Arc::new(JobLedger::open(dir)?),
            Arc::new(NotificationLedger::open(dir)?),
            Arc::new(FreelancerLedger::open(dir)?),
        ))
    }
}
