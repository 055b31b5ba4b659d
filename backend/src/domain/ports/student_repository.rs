//! Port for student account persistence.

use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::{ProfileUpdate, StudentUpdate, User};

use super::{define_port_error, PageOf};

define_port_error! {
    /// Errors raised by student repository adapters.
    pub enum StudentPersistenceError {
        /// Repository connection could not be established.
        Connection => "student repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "student repository query failed: {message}",
        /// Another account already holds this email address.
        DuplicateEmail => "email already registered: {message}",
    }
}

/// A user record paired with its stored password hash, for login checks.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Port for writing and reading user accounts.
///
/// Student-scoped reads and writes filter on the student role; `find_by_id`
/// and `find_by_email` resolve any account, which login and session loading
/// need.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Persist a new user alongside its password hash.
    async fn insert(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<(), StudentPersistenceError>;

    /// Find an active account of any role by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StudentPersistenceError>;

    /// Find an active account by normalized email, with credential material.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, StudentPersistenceError>;

    /// Find an active student account by id.
    async fn find_student(&self, id: Uuid) -> Result<Option<User>, StudentPersistenceError>;

    /// List active students, optionally filtered by a name/email search term.
    async fn list_students<'a>(
        &self,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<PageOf<User>, StudentPersistenceError>;

    /// Replace a student's editable fields. `None` when no active student
    /// matches.
    async fn update_student(
        &self,
        id: Uuid,
        update: &StudentUpdate,
    ) -> Result<Option<User>, StudentPersistenceError>;

    /// Replace the caller's own profile fields. `None` when no active student
    /// matches.
    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StudentPersistenceError>;

    /// Deactivate a student account. Returns whether a row changed.
    async fn delete_student(&self, id: Uuid) -> Result<bool, StudentPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn duplicate_email_formats_message() {
        let err = StudentPersistenceError::duplicate_email("ada@example.com");
        assert!(err.to_string().contains("ada@example.com"));
    }
}
