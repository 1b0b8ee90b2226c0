use std::sync::Arc;

use tracing::info;

use super::directory::{DirectoryError, FreelancerDirectory};
use super::domain::{NewUser, UserAccount, UserId, UserProfile};
use super::store::{FreelancerStore, StoreError, UserStore};

/// Signup and authentication over the shared identity store. Freelancer
/// signups also land in the searchable directory.
pub struct IdentityService<U, F> {
    users: Arc<U>,
    directory: Arc<FreelancerDirectory<F>>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("username is already taken")]
    DuplicateUsername,
    /// Deliberately detail-free so callers cannot probe which usernames
    /// exist.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl<U, F> IdentityService<U, F>
where
    U: UserStore,
    F: FreelancerStore,
{
    pub fn new(users: Arc<U>, directory: Arc<FreelancerDirectory<F>>) -> Self {
        Self { users, directory }
    }

    pub fn register_user(&self, signup: NewUser) -> Result<UserId, IdentityError> {
        let username = signup.profile.id();
        if username.0.trim().is_empty() {
            return Err(IdentityError::MissingField("username"));
        }
        if signup.profile.display_name().trim().is_empty() {
            return Err(IdentityError::MissingField("display name"));
        }
        if signup.secret.is_empty() {
            return Err(IdentityError::MissingField("secret"));
        }

        let account = UserAccount {
            profile: signup.profile,
            secret: signup.secret,
        };
        match self.users.insert(account.clone()) {
            Ok(()) => {}
            Err(StoreError::Conflict) => return Err(IdentityError::DuplicateUsername),
            Err(other) => return Err(other.into()),
        }

        if let UserProfile::Freelancer(profile) = &account.profile {
            self.directory.register(profile.clone())?;
        }

        info!(user = %username, role = account.profile.role_label(), "user registered");
        Ok(username)
    }

    pub fn authenticate(&self, username: &str, secret: &str) -> Result<UserId, IdentityError> {
        let id = UserId(username.to_string());
        match self.users.fetch(&id)? {
            Some(account) if account.secret == secret => Ok(id),
            _ => Err(IdentityError::InvalidCredentials),
        }
    }
}
