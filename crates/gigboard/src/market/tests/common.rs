use std::sync::Arc;

use crate::market::domain::{
    ClientProfile, FreelancerProfile, Job, NewUser, Notification, UserId, UserProfile,
};
use crate::market::ledger::{FreelancerLedger, JobLedger, NotificationLedger, UserLedger};
use crate::market::service::{LedgerMarketplace, Marketplace};

pub(super) struct TestMarket {
    pub(super) market: Arc<LedgerMarketplace>,
    pub(super) jobs: Arc<JobLedger>,
    pub(super) notifications: Arc<NotificationLedger>,
}

pub(super) fn build_market() -> TestMarket {
    let users = Arc::new(UserLedger::in_memory());
    let jobs = Arc::new(JobLedger::in_memory());
    let notifications = Arc::new(NotificationLedger::in_memory());
    let freelancers = Arc::new(FreelancerLedger::in_memory());
    let market = Arc::new(Marketplace::new(
        users,
        jobs.clone(),
        notifications.clone(),
        freelancers,
    ));
    TestMarket {
        market,
        jobs,
        notifications,
    }
}

pub(super) fn client_signup(username: &str) -> NewUser {
    NewUser {
        profile: UserProfile::Client(ClientProfile {
            username: username.to_string(),
            display_name: "Casey Ortiz".to_string(),
            email: format!("{username}@example.net"),
            phone: "555-0101".to_string(),
        }),
        secret: "open-sesame".to_string(),
    }
}

pub(super) fn freelancer_signup(username: &str, specialization: &str) -> NewUser {
    NewUser {
        profile: UserProfile::Freelancer(FreelancerProfile {
            username: username.to_string(),
            display_name: titlecase(username),
            email: format!("{username}@example.net"),
            phone: "555-0102".to_string(),
            rating: 4.8,
            specialization: specialization.to_string(),
        }),
        secret: "let-me-in".to_string(),
    }
}

fn titlecase(username: &str) -> String {
    let mut chars = username.chars();
    match chars.next() {
        Some(first) => format!("{}{} Vale", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Registers the default client and freelancer pair used by most scenarios.
pub(super) fn seeded_market() -> (TestMarket, UserId, UserId) {
    let harness = build_market();
    let client = harness
        .market
        .register_user(client_signup("casey"))
        .expect("client signup");
    let freelancer = harness
        .market
        .register_user(freelancer_signup("finley", "web development"))
        .expect("freelancer signup");
    (harness, client, freelancer)
}

/// Posts and accepts a web/medium/10h job, returning it plus the actionable
/// acceptance notification that landed in the client's inbox.
pub(super) fn accepted_job(
    harness: &TestMarket,
    client: &UserId,
    freelancer: &UserId,
) -> (Job, Notification) {
    let job = harness
        .market
        .post_job(client, "web", "medium", 10.0, "Marketing site refresh")
        .expect("job posts");
    let job = harness
        .market
        .accept_job(job.id, freelancer)
        .expect("job accepts");
    let notification = harness
        .market
        .inbox(client)
        .expect("client inbox")
        .into_iter()
        .find(|entry| entry.job_id == job.id && entry.actionable)
        .expect("acceptance notification present");
    (job, notification)
}
