//! Lesson administration domain service.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageInfo, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{LessonPersistenceError, LessonRepository, LessonService};
use crate::domain::{Error, Lesson, LessonDraft, LessonStats, LessonUpdate};

fn map_repository_error(error: LessonPersistenceError) -> Error {
    match error {
        LessonPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("lesson repository unavailable: {message}"))
        }
        LessonPersistenceError::Query { message } => {
            Error::internal(format!("lesson repository error: {message}"))
        }
        LessonPersistenceError::DuplicateName { .. } => {
            Error::invalid_request("Lesson name already exists")
        }
        LessonPersistenceError::DuplicateCode { .. } => {
            Error::invalid_request("Lesson code already exists")
        }
    }
}

fn lesson_not_found() -> Error {
    Error::not_found("Lesson not found")
}

/// Lesson CRUD, statistics, and availability backed by the lesson repository.
#[derive(Clone)]
pub struct LessonServiceImpl<L> {
    lessons: Arc<L>,
}

impl<L> LessonServiceImpl<L> {
    /// Create the service with the lesson repository.
    pub fn new(lessons: Arc<L>) -> Self {
        Self { lessons }
    }
}

#[async_trait]
impl<L> LessonService for LessonServiceImpl<L>
where
    L: LessonRepository,
{
    async fn create(&self, draft: LessonDraft) -> Result<Lesson, Error> {
        let lesson = Lesson::new(draft).map_err(|err| Error::invalid_request(err.to_string()))?;

        self.lessons
            .insert(&lesson)
            .await
            .map_err(map_repository_error)?;

        Ok(lesson)
    }

    async fn list<'a>(
        &self,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<(Vec<Lesson>, PageInfo), Error> {
        let result = self
            .lessons
            .list(page, search)
            .await
            .map_err(map_repository_error)?;
        let info = PageInfo::new(page, result.total);
        Ok((result.items, info))
    }

    async fn get(&self, id: Uuid) -> Result<Lesson, Error> {
        self.lessons
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(lesson_not_found)
    }

    async fn update(&self, id: Uuid, update: LessonUpdate) -> Result<Lesson, Error> {
        self.lessons
            .update(id, &update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(lesson_not_found)
    }

    async fn deactivate(&self, id: Uuid) -> Result<(), Error> {
        let removed = self
            .lessons
            .deactivate(id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(lesson_not_found());
        }
        Ok(())
    }

    async fn stats(&self) -> Result<LessonStats, Error> {
        self.lessons.stats().await.map_err(map_repository_error)
    }

    async fn available_for_student<'a>(
        &self,
        student_id: Uuid,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<(Vec<Lesson>, PageInfo), Error> {
        let result = self
            .lessons
            .list_available_for_student(student_id, page, search)
            .await
            .map_err(map_repository_error)?;
        let info = PageInfo::new(page, result.total);
        Ok((result.items, info))
    }
}

#[cfg(test)]
#[path = "lesson_service_tests.rs"]
mod tests;
