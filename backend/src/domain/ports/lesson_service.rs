//! Driving port for lesson administration and availability reads.

use async_trait::async_trait;
use pagination::{PageInfo, PageRequest};
use uuid::Uuid;

use crate::domain::{Error, Lesson, LessonDraft, LessonStats, LessonUpdate};

/// Lesson operations exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LessonService: Send + Sync {
    /// Create a lesson.
    async fn create(&self, draft: LessonDraft) -> Result<Lesson, Error>;

    /// Page through active lessons, optionally filtered by a search term.
    async fn list<'a>(
        &self,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<(Vec<Lesson>, PageInfo), Error>;

    /// Load a single active lesson.
    async fn get(&self, id: Uuid) -> Result<Lesson, Error>;

    /// Replace a lesson's editable fields.
    async fn update(&self, id: Uuid, update: LessonUpdate) -> Result<Lesson, Error>;

    /// Deactivate a lesson.
    async fn deactivate(&self, id: Uuid) -> Result<(), Error>;

    /// Aggregate counts across all active lessons.
    async fn stats(&self) -> Result<LessonStats, Error>;

    /// Page through active lessons the student is not already enrolled in.
    async fn available_for_student<'a>(
        &self,
        student_id: Uuid,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<(Vec<Lesson>, PageInfo), Error>;
}
