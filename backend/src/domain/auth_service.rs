//! Authentication domain service.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    AuthService, StudentPersistenceError, StudentRepository,
};
use crate::domain::{password, validated_password, Error, User, UserDraft};

fn map_repository_error(error: StudentPersistenceError) -> Error {
    match error {
        StudentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("student repository unavailable: {message}"))
        }
        StudentPersistenceError::Query { message } => {
            Error::internal(format!("student repository error: {message}"))
        }
        StudentPersistenceError::DuplicateEmail { .. } => {
            Error::invalid_request("Email already registered")
        }
    }
}

/// Registration and login backed by the student repository.
#[derive(Clone)]
pub struct AuthServiceImpl<S> {
    students: Arc<S>,
}

impl<S> AuthServiceImpl<S> {
    /// Create the service with the student repository.
    pub fn new(students: Arc<S>) -> Self {
        Self { students }
    }
}

#[async_trait]
impl<S> AuthService for AuthServiceImpl<S>
where
    S: StudentRepository,
{
    async fn register(&self, draft: UserDraft, password: &str) -> Result<User, Error> {
        validated_password(password).map_err(|err| Error::invalid_request(err.to_string()))?;
        let user = User::new(draft).map_err(|err| Error::invalid_request(err.to_string()))?;
        let hash = password::hash_password(password)?;

        self.students
            .insert(&user, &hash)
            .await
            .map_err(map_repository_error)?;

        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        // Lookup and verification failures collapse into one message so a
        // caller cannot probe which emails are registered.
        let credentials = self
            .students
            .find_by_email(&email.trim().to_lowercase())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("Invalid credentials"))?;

        if !password::verify_password(password, &credentials.password_hash)? {
            return Err(Error::unauthorized("Invalid credentials"));
        }

        Ok(credentials.user)
    }

    async fn profile(&self, user_id: Uuid) -> Result<User, Error> {
        self.students
            .find_by_id(user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
