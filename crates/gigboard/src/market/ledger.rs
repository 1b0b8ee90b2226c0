//! Concrete collection ledgers.
//!
//! Each ledger keeps its records behind its own mutex and, when opened on a
//! data directory, mirrors them into a JSON snapshot file. Mutations build
//! the next state first, flush it, and only then make it visible: a write
//! that cannot be committed durably rolls back and surfaces
//! [`StoreError::Unavailable`] instead of reporting success.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::warn;

use super::domain::{
    FreelancerProfile, Job, JobDraft, JobId, JobStatus, Notification, NotificationDraft,
    NotificationId, UserAccount, UserId,
};
use super::store::{FreelancerStore, JobStore, NotificationStore, StoreError, UserStore};

const FLUSH_ATTEMPTS: u32 = 3;

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn flush_snapshot<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(records)
        .map_err(|err| StoreError::Unavailable(format!("snapshot encoding failed: {err}")))?;

    let mut last_error = None;
    for attempt in 1..=FLUSH_ATTEMPTS {
        match write_atomic(path, &bytes) {
            Ok(()) => return Ok(()),
            Err(err) => {
                warn!(path = %path.display(), attempt, "snapshot flush failed: {err}");
                last_error = Some(err);
            }
        }
    }

    let err = last_error.map(|err| err.to_string()).unwrap_or_default();
    Err(StoreError::Unavailable(format!(
        "could not flush {} after {FLUSH_ATTEMPTS} attempts: {err}",
        path.display()
    )))
}

fn load_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = fs::read(path)
        .map_err(|err| StoreError::Unavailable(format!("cannot read {}: {err}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| StoreError::Unavailable(format!("corrupt snapshot {}: {err}", path.display())))
}

fn collection_path(dir: &Path, name: &str) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir)
        .map_err(|err| StoreError::Unavailable(format!("cannot create {}: {err}", dir.display())))?;
    Ok(dir.join(format!("{name}.json")))
}

/// Identity records keyed by username.
pub struct UserLedger {
    inner: Mutex<HashMap<String, UserAccount>>,
    path: Option<PathBuf>,
}

impl UserLedger {
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            path: None,
        }
    }

    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        let path = collection_path(dir, "users")?;
        let accounts: Vec<UserAccount> = load_snapshot(&path)?;
        let records = accounts
            .into_iter()
            .map(|account| (account.id().0, account))
            .collect();
        Ok(Self {
            inner: Mutex::new(records),
            path: Some(path),
        })
    }

    fn flush(&self, records: &HashMap<String, UserAccount>) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            let mut rows: Vec<&UserAccount> = records.values().collect();
            rows.sort_by(|a, b| a.id().0.cmp(&b.id().0));
            flush_snapshot(path, &rows)?;
        }
        Ok(())
    }
}

impl UserStore for UserLedger {
    fn insert(&self, account: UserAccount) -> Result<(), StoreError> {
        let mut records = self.inner.lock().expect("user ledger mutex poisoned");
        let key = account.id().0;
        if records.contains_key(&key) {
            return Err(StoreError::Conflict);
        }
        let mut next = records.clone();
        next.insert(key, account);
        self.flush(&next)?;
        *records = next;
        Ok(())
    }

    fn fetch(&self, id: &UserId) -> Result<Option<UserAccount>, StoreError> {
        let records = self.inner.lock().expect("user ledger mutex poisoned");
        Ok(records.get(&id.0).cloned())
    }
}

struct JobCells {
    records: HashMap<u64, Job>,
    next_id: u64,
}

/// Job records with monotonically assigned ids. The revision-checked `swap`
/// is performed entirely under this ledger's lock.
pub struct JobLedger {
    inner: Mutex<JobCells>,
    path: Option<PathBuf>,
}

impl JobLedger {
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(JobCells {
                records: HashMap::new(),
                next_id: 1,
            }),
            path: None,
        }
    }

    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        let path = collection_path(dir, "jobs")?;
        let jobs: Vec<Job> = load_snapshot(&path)?;
        let next_id = jobs.iter().map(|job| job.id.0).max().unwrap_or(0) + 1;
        let records = jobs.into_iter().map(|job| (job.id.0, job)).collect();
        Ok(Self {
            inner: Mutex::new(JobCells { records, next_id }),
            path: Some(path),
        })
    }

    fn flush(&self, records: &HashMap<u64, Job>) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            let mut rows: Vec<&Job> = records.values().collect();
            rows.sort_by_key(|job| job.id);
            flush_snapshot(path, &rows)?;
        }
        Ok(())
    }
}

impl JobStore for JobLedger {
    fn append(&self, draft: JobDraft) -> Result<Job, StoreError> {
        let mut cells = self.inner.lock().expect("job ledger mutex poisoned");
        let job = Job {
            id: JobId(cells.next_id),
            revision: 1,
            posted_by: draft.posted_by,
            service_type: draft.service_type,
            complexity: draft.complexity,
            hours: draft.hours,
            description: draft.description,
            price: draft.price,
            status: JobStatus::Open,
            accepted_by: None,
            posted_at: draft.posted_at,
        };
        let mut next = cells.records.clone();
        next.insert(job.id.0, job.clone());
        self.flush(&next)?;
        cells.records = next;
        cells.next_id += 1;
        Ok(job)
    }

    fn fetch(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        let cells = self.inner.lock().expect("job ledger mutex poisoned");
        Ok(cells.records.get(&id.0).cloned())
    }

    fn open_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let cells = self.inner.lock().expect("job ledger mutex poisoned");
        let mut open: Vec<Job> = cells
            .records
            .values()
            .filter(|job| job.status == JobStatus::Open)
            .cloned()
            .collect();
        open.sort_by_key(|job| job.id);
        Ok(open)
    }

    fn swap(&self, updated: Job) -> Result<Job, StoreError> {
        let mut cells = self.inner.lock().expect("job ledger mutex poisoned");
        let current = cells.records.get(&updated.id.0).ok_or(StoreError::NotFound)?;
        if current.revision + 1 != updated.revision {
            return Err(StoreError::Conflict);
        }
        let mut next = cells.records.clone();
        next.insert(updated.id.0, updated.clone());
        self.flush(&next)?;
        cells.records = next;
        Ok(updated)
    }
}

struct NotificationCells {
    records: HashMap<u64, Notification>,
    next_id: u64,
}

/// Mailbox entries for every recipient.
pub struct NotificationLedger {
    inner: Mutex<NotificationCells>,
    path: Option<PathBuf>,
}

impl NotificationLedger {
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(NotificationCells {
                records: HashMap::new(),
                next_id: 1,
            }),
            path: None,
        }
    }

    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        let path = collection_path(dir, "notifications")?;
        let entries: Vec<Notification> = load_snapshot(&path)?;
        let next_id = entries.iter().map(|entry| entry.id.0).max().unwrap_or(0) + 1;
        let records = entries.into_iter().map(|entry| (entry.id.0, entry)).collect();
        Ok(Self {
            inner: Mutex::new(NotificationCells { records, next_id }),
            path: Some(path),
        })
    }

    fn flush(&self, records: &HashMap<u64, Notification>) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            let mut rows: Vec<&Notification> = records.values().collect();
            rows.sort_by_key(|entry| entry.id);
            flush_snapshot(path, &rows)?;
        }
        Ok(())
    }
}

impl NotificationStore for NotificationLedger {
    fn append(&self, draft: NotificationDraft) -> Result<Notification, StoreError> {
        let mut cells = self.inner.lock().expect("notification ledger mutex poisoned");
        let entry = Notification {
            id: NotificationId(cells.next_id),
            recipient: draft.recipient,
            title: draft.title,
            body: draft.body,
            actionable: draft.actionable,
            job_id: draft.job_id,
            amount: draft.amount,
            paid: draft.paid,
            created_at: draft.created_at,
        };
        let mut next = cells.records.clone();
        next.insert(entry.id.0, entry.clone());
        self.flush(&next)?;
        cells.records = next;
        cells.next_id += 1;
        Ok(entry)
    }

    fn fetch(&self, id: NotificationId) -> Result<Option<Notification>, StoreError> {
        let cells = self.inner.lock().expect("notification ledger mutex poisoned");
        Ok(cells.records.get(&id.0).cloned())
    }

    fn inbox(&self, recipient: &UserId) -> Result<Vec<Notification>, StoreError> {
        let cells = self.inner.lock().expect("notification ledger mutex poisoned");
        let mut entries: Vec<Notification> = cells
            .records
            .values()
            .filter(|entry| entry.recipient == *recipient)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(entries)
    }

    fn mark_paid(&self, id: NotificationId) -> Result<Notification, StoreError> {
        let mut cells = self.inner.lock().expect("notification ledger mutex poisoned");
        let mut entry = cells.records.get(&id.0).cloned().ok_or(StoreError::NotFound)?;
        entry.paid = Some(true);
        let mut next = cells.records.clone();
        next.insert(id.0, entry.clone());
        self.flush(&next)?;
        cells.records = next;
        Ok(entry)
    }
}

/// Freelancer roster kept in registration order.
pub struct FreelancerLedger {
    inner: Mutex<Vec<FreelancerProfile>>,
    path: Option<PathBuf>,
}

impl FreelancerLedger {
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
            path: None,
        }
    }

    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        let path = collection_path(dir, "freelancers")?;
        let roster: Vec<FreelancerProfile> = load_snapshot(&path)?;
        Ok(Self {
            inner: Mutex::new(roster),
            path: Some(path),
        })
    }

    fn flush(&self, roster: &[FreelancerProfile]) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            flush_snapshot(path, roster)?;
        }
        Ok(())
    }
}

impl FreelancerStore for FreelancerLedger {
    fn register(&self, profile: FreelancerProfile) -> Result<bool, StoreError> {
        let mut roster = self.inner.lock().expect("freelancer ledger mutex poisoned");
        if roster.iter().any(|known| known.username == profile.username) {
            return Ok(false);
        }
        let mut next = roster.clone();
        next.push(profile);
        self.flush(&next)?;
        *roster = next;
        Ok(true)
    }

    fn all(&self) -> Result<Vec<FreelancerProfile>, StoreError> {
        let roster = self.inner.lock().expect("freelancer ledger mutex poisoned");
        Ok(roster.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::market::domain::{Complexity, ServiceCategory};

    fn draft(description: &str) -> JobDraft {
        JobDraft {
            posted_by: UserId::from("casey"),
            service_type: ServiceCategory::Web,
            complexity: Complexity::Medium,
            hours: 10.0,
            description: description.to_string(),
            price: 750.0,
            posted_at: Utc::now(),
        }
    }

    #[test]
    fn job_ids_are_assigned_monotonically() {
        let ledger = JobLedger::in_memory();
        let first = ledger.append(draft("landing page")).expect("append");
        let second = ledger.append(draft("api integration")).expect("append");
        assert_eq!(first.id, JobId(1));
        assert_eq!(second.id, JobId(2));
    }

    #[test]
    fn swap_rejects_stale_revisions() {
        let ledger = JobLedger::in_memory();
        let job = ledger.append(draft("landing page")).expect("append");

        let mut winner = job.clone();
        winner.revision += 1;
        winner.status = JobStatus::Accepted;
        winner.accepted_by = Some(UserId::from("finley"));
        ledger.swap(winner).expect("first swap commits");

        let mut loser = job;
        loser.revision += 1;
        loser.status = JobStatus::Accepted;
        loser.accepted_by = Some(UserId::from("rowan"));
        assert!(matches!(ledger.swap(loser), Err(StoreError::Conflict)));
    }

    #[test]
    fn id_counter_resumes_after_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let ledger = JobLedger::open(dir.path()).expect("open");
            ledger.append(draft("first")).expect("append");
            ledger.append(draft("second")).expect("append");
        }
        let reopened = JobLedger::open(dir.path()).expect("reopen");
        let third = reopened.append(draft("third")).expect("append");
        assert_eq!(third.id, JobId(3));
    }

    #[test]
    fn roster_registration_is_idempotent() {
        let ledger = FreelancerLedger::in_memory();
        let profile = FreelancerProfile {
            username: "finley".to_string(),
            display_name: "Finley Ames".to_string(),
            email: "finley@example.net".to_string(),
            phone: "555-0102".to_string(),
            rating: 4.8,
            specialization: "web development".to_string(),
        };
        assert!(ledger.register(profile.clone()).expect("first registration"));
        assert!(!ledger.register(profile).expect("second registration"));
        assert_eq!(ledger.all().expect("roster").len(), 1);
    }
}
