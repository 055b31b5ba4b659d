//! Port for lesson persistence and atomic seat accounting.

use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::{Lesson, LessonStats, LessonUpdate};

use super::{define_port_error, PageOf};

define_port_error! {
    /// Errors raised by lesson repository adapters.
    pub enum LessonPersistenceError {
        /// Repository connection could not be established.
        Connection => "lesson repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "lesson repository query failed: {message}",
        /// Another lesson already uses this name.
        DuplicateName => "lesson name already in use: {message}",
        /// Another lesson already uses this code.
        DuplicateCode => "lesson code already in use: {message}",
    }
}

/// Outcome of a conditional seat increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatAcquisition {
    /// A seat was claimed; the enrolled count has been incremented.
    Acquired,
    /// The lesson exists and is active but every seat is taken.
    Full,
    /// No active lesson matches the id.
    MissingOrInactive,
}

/// Port for writing and reading lessons.
///
/// `acquire_seat` and `release_seat` are the only paths that touch the
/// enrolled count. Both apply a single conditional update so concurrent
/// enrollments can never push the count past capacity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Persist a new lesson.
    async fn insert(&self, lesson: &Lesson) -> Result<(), LessonPersistenceError>;

    /// Find an active lesson by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lesson>, LessonPersistenceError>;

    /// List active lessons, optionally filtered by a name/code/instructor
    /// search term.
    async fn list<'a>(
        &self,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<PageOf<Lesson>, LessonPersistenceError>;

    /// List active lessons the given student holds no active enrollment in,
    /// with the same search filter as [`LessonRepository::list`].
    async fn list_available_for_student<'a>(
        &self,
        student_id: Uuid,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<PageOf<Lesson>, LessonPersistenceError>;

    /// Replace a lesson's editable fields. `None` when no active lesson
    /// matches.
    async fn update(
        &self,
        id: Uuid,
        update: &LessonUpdate,
    ) -> Result<Option<Lesson>, LessonPersistenceError>;

    /// Deactivate a lesson. Returns whether a row changed.
    async fn deactivate(&self, id: Uuid) -> Result<bool, LessonPersistenceError>;

    /// Claim one seat if the lesson is active and under capacity.
    async fn acquire_seat(&self, id: Uuid) -> Result<SeatAcquisition, LessonPersistenceError>;

    /// Return one seat, never dropping the count below zero.
    async fn release_seat(&self, id: Uuid) -> Result<(), LessonPersistenceError>;

    /// Aggregate counts across all active lessons.
    async fn stats(&self) -> Result<LessonStats, LessonPersistenceError>;
}
