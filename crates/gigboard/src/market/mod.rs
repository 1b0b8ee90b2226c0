//! The marketplace core: pricing, the job lifecycle state machine, the
//! per-user mailbox, payment confirmation, the freelancer directory, and the
//! ledgers backing them.
//!
//! Components are wired together by [`service::Marketplace`]; the HTTP
//! surface lives in [`router`]. Everything below the facade is reachable for
//! tests and for callers embedding the core in-process.

pub mod directory;
pub mod domain;
pub mod events;
pub mod identity;
pub mod jobs;
pub mod ledger;
pub mod mailbox;
pub mod payment;
pub mod pricing;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use directory::{DirectoryError, FreelancerDirectory};
pub use domain::{
    round_to_cents, ClientProfile, Complexity, FreelancerProfile, IntentId, Job, JobDraft, JobId,
    JobStatus, JobView, NewUser, Notification, NotificationDraft, NotificationId, PaymentIntent,
    PaymentOutcome, PaymentReceipt, ServiceCategory, UserAccount, UserId, UserProfile,
};
pub use events::{EventError, EventPublisher, MarketEvent};
pub use identity::{IdentityError, IdentityService};
pub use jobs::{JobError, JobService};
pub use ledger::{FreelancerLedger, JobLedger, NotificationLedger, UserLedger};
pub use mailbox::{MailboxError, MailboxService};
pub use payment::{PaymentError, PaymentProcessor};
pub use pricing::PricingError;
pub use router::market_router;
pub use service::{LedgerMarketplace, MarketError, Marketplace};
pub use store::{FreelancerStore, JobStore, NotificationStore, StoreError, UserStore};
