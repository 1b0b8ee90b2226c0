use std::sync::Arc;

use super::domain::FreelancerProfile;
use super::store::{FreelancerStore, StoreError};

/// Registry of freelancer profiles, fed by signups.
pub struct FreelancerDirectory<F> {
    roster: Arc<F>,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<F> FreelancerDirectory<F>
where
    F: FreelancerStore,
{
    pub fn new(roster: Arc<F>) -> Self {
        Self { roster }
    }

    /// Add a freelancer to the directory. Registering the same username
    /// twice is a no-op; returns whether the profile was actually added.
    pub fn register(&self, profile: FreelancerProfile) -> Result<bool, DirectoryError> {
        Ok(self.roster.register(profile)?)
    }

    /// Case-insensitive substring search against display name or
    /// specialization, in registration order.
    pub fn search(&self, term: &str) -> Result<Vec<FreelancerProfile>, DirectoryError> {
        let needle = term.trim().to_lowercase();
        let matches = self
            .roster
            .all()?
            .into_iter()
            .filter(|profile| {
                profile.display_name.to_lowercase().contains(&needle)
                    || profile.specialization.to_lowercase().contains(&needle)
            })
            .collect();
        Ok(matches)
    }
}
