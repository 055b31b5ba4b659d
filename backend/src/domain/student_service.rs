//! Student administration domain service.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageInfo, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{
    StudentPersistenceError, StudentRepository, StudentService,
};
use crate::domain::{
    password, validated_password, Error, ProfileUpdate, StudentUpdate, User, UserDraft,
};

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

fn student_not_found() -> Error {
    Error::not_found("Student not found")
}

/// Student CRUD and profile self-service backed by the student repository.
#[derive(Clone)]
pub struct StudentServiceImpl<S> {
    students: Arc<S>,
}

impl<S> StudentServiceImpl<S> {
    /// Create the service with the student repository.
    pub fn new(students: Arc<S>) -> Self {
        Self { students }
    }
}

#[async_trait]
impl<S> StudentService for StudentServiceImpl<S>
where
    S: StudentRepository,
{
    async fn create(&self, draft: UserDraft, password: &str) -> Result<User, Error> {
        validated_password(password).map_err(|err| Error::invalid_request(err.to_string()))?;
        let user = User::new(draft).map_err(|err| Error::invalid_request(err.to_string()))?;
        let hash = password::hash_password(password)?;

        self.students
            .insert(&user, &hash)
            .await
            .map_err(map_repository_error)?;

        Ok(user)
    }

    async fn list<'a>(
        &self,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<(Vec<User>, PageInfo), Error> {
        let result = self
            .students
            .list_students(page, search)
            .await
            .map_err(map_repository_error)?;
        let info = PageInfo::new(page, result.total);
        Ok((result.items, info))
    }

    async fn get(&self, id: Uuid) -> Result<User, Error> {
        self.students
            .find_student(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(student_not_found)
    }

    async fn update(&self, id: Uuid, update: StudentUpdate) -> Result<User, Error> {
        self.students
            .update_student(id, &update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(student_not_found)
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let removed = self
            .students
            .delete_student(id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(student_not_found());
        }
        Ok(())
    }

    async fn profile(&self, id: Uuid) -> Result<User, Error> {
        self.students
            .find_student(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(student_not_found)
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, Error> {
        self.students
            .update_profile(id, &update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(student_not_found)
    }
}

#[cfg(test)]
#[path = "student_service_tests.rs"]
mod tests;
