//! Driving port for registration, login, and profile reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, User, UserDraft};

/// Authentication operations exposed to inbound adapters.
///
/// Session creation stays in the HTTP layer; these methods only decide
/// whether the credentials and accounts check out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account with the given plaintext password.
    async fn register(&self, draft: UserDraft, password: &str) -> Result<User, Error>;

    /// Verify credentials and return the matching active account.
    async fn login(&self, email: &str, password: &str) -> Result<User, Error>;

    /// Load the authenticated caller's account.
    async fn profile(&self, user_id: Uuid) -> Result<User, Error>;
}
