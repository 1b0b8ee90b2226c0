use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{Job, JobDraft, JobId, JobStatus, ServiceCategory, UserId, UserProfile};
use super::events::{EventError, EventPublisher, MarketEvent};
use super::pricing::{self, PricingError};
use super::store::{JobStore, StoreError, UserStore};

/// Owns the Open -> Accepted -> Paid state machine for job records.
pub struct JobService<U, J, E> {
    users: Arc<U>,
    jobs: Arc<J>,
    events: Arc<E>,
}

/// Error raised by the job lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("job {0} not found")]
    NotFound(JobId),
    #[error("job {0} is no longer open")]
    NotOpen(JobId),
    #[error("unknown user '{0}'")]
    UnknownUser(UserId),
    #[error("user '{0}' is not a client")]
    NotAClient(UserId),
    #[error("user '{0}' is not a freelancer")]
    NotAFreelancer(UserId),
    #[error("a job description is required")]
    EmptyDescription,
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Event(#[from] EventError),
}

impl<U, J, E> JobService<U, J, E>
where
    U: UserStore,
    J: JobStore,
    E: EventPublisher,
{
    pub fn new(users: Arc<U>, jobs: Arc<J>, events: Arc<E>) -> Self {
        Self { users, jobs, events }
    }

    /// Price and store a new job in Open state. The ledger's flush completes
    /// before the job is returned.
    pub fn post_job(
        &self,
        client: &UserId,
        service_label: &str,
        complexity_label: &str,
        hours: f64,
        description: &str,
    ) -> Result<Job, JobError> {
        let account = self
            .users
            .fetch(client)?
            .ok_or_else(|| JobError::UnknownUser(client.clone()))?;
        if !matches!(account.profile, UserProfile::Client(_)) {
            return Err(JobError::NotAClient(client.clone()));
        }

        let description = description.trim();
        if description.is_empty() {
            return Err(JobError::EmptyDescription);
        }

        let service_type = ServiceCategory::from_label(service_label);
        let complexity = pricing::parse_complexity(complexity_label)?;
        let price = pricing::quote(service_type, complexity, hours)?;

        let job = self.jobs.append(JobDraft {
            posted_by: client.clone(),
            service_type,
            complexity,
            hours,
            description: description.to_string(),
            price,
            posted_at: Utc::now(),
        })?;

        debug!(job = %job.id, client = %client, "job posted");
        Ok(job)
    }

    /// Every job still open, in posting order (oldest first).
    pub fn open_jobs(&self) -> Result<Vec<Job>, JobError> {
        Ok(self.jobs.open_jobs()?)
    }

    pub fn fetch(&self, id: JobId) -> Result<Option<Job>, JobError> {
        Ok(self.jobs.fetch(id)?)
    }

    /// Atomically claim an open job for a freelancer.
    ///
    /// The transition is a revision-checked swap: when two acceptances race,
    /// the ledger commits exactly one and the other observes a conflict,
    /// surfaced here as [`JobError::NotOpen`]. A lost race is expected and
    /// non-fatal; the caller refreshes the open-jobs list.
    pub fn accept_job(&self, id: JobId, freelancer: &UserId) -> Result<Job, JobError> {
        let account = self
            .users
            .fetch(freelancer)?
            .ok_or_else(|| JobError::UnknownUser(freelancer.clone()))?;
        let UserProfile::Freelancer(profile) = account.profile else {
            return Err(JobError::NotAFreelancer(freelancer.clone()));
        };

        let job = self.jobs.fetch(id)?.ok_or(JobError::NotFound(id))?;
        if job.status != JobStatus::Open {
            return Err(JobError::NotOpen(id));
        }

        let mut updated = job;
        updated.revision += 1;
        updated.status = JobStatus::Accepted;
        updated.accepted_by = Some(freelancer.clone());

        let job = match self.jobs.swap(updated) {
            Ok(job) => job,
            Err(StoreError::Conflict) => return Err(JobError::NotOpen(id)),
            Err(StoreError::NotFound) => return Err(JobError::NotFound(id)),
            Err(other) => return Err(other.into()),
        };

        self.events.publish(MarketEvent::JobAccepted {
            job_id: job.id,
            client: job.posted_by.clone(),
            freelancer: freelancer.clone(),
            freelancer_contact: profile.contact_line(),
            amount: job.price,
        })?;

        info!(job = %job.id, freelancer = %freelancer, "job accepted");
        Ok(job)
    }
}
