//! Driving port for student administration and self-service profiles.

use async_trait::async_trait;
use pagination::{PageInfo, PageRequest};
use uuid::Uuid;

use crate::domain::{Error, ProfileUpdate, StudentUpdate, User, UserDraft};

/// Student account operations exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentService: Send + Sync {
    /// Create a student account with the given plaintext password.
    async fn create(&self, draft: UserDraft, password: &str) -> Result<User, Error>;

    /// Page through active students, optionally filtered by a search term.
    async fn list<'a>(
        &self,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<(Vec<User>, PageInfo), Error>;

    /// Load a single active student.
    async fn get(&self, id: Uuid) -> Result<User, Error>;

    /// Replace a student's editable fields.
    async fn update(&self, id: Uuid, update: StudentUpdate) -> Result<User, Error>;

    /// Deactivate a student account.
    async fn delete(&self, id: Uuid) -> Result<(), Error>;

    /// Load the calling student's own record.
    async fn profile(&self, id: Uuid) -> Result<User, Error>;

    /// Replace the calling student's own profile fields.
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, Error>;
}
