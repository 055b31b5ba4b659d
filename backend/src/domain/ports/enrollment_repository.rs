//! Port for enrollment persistence.

use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::{
    Enrollment, EnrollmentDetail, EnrollmentWithLesson, EnrollmentWithStudent,
};

use super::{define_port_error, PageOf};

define_port_error! {
    /// Errors raised by enrollment repository adapters.
    pub enum EnrollmentPersistenceError {
        /// Repository connection could not be established.
        Connection => "enrollment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "enrollment repository query failed: {message}",
        /// An active enrollment already exists for this student and lesson.
        DuplicateActive => "active enrollment already exists: {message}",
    }
}

/// Port for writing and reading enrollments.
///
/// A partial unique index on `(student_id, lesson_id)` over active rows backs
/// `insert_active`; inserting a second active enrollment surfaces as
/// `DuplicateActive` rather than a plain query failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Persist a new active enrollment.
    async fn insert_active(
        &self,
        enrollment: &Enrollment,
    ) -> Result<(), EnrollmentPersistenceError>;

    /// Find an enrollment by id, whatever its status.
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Enrollment>, EnrollmentPersistenceError>;

    /// Find the active enrollment for a student/lesson pair.
    async fn find_active(
        &self,
        student_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<Enrollment>, EnrollmentPersistenceError>;

    /// Transition an active enrollment to dropped. Returns whether a row
    /// changed.
    async fn mark_dropped(&self, id: Uuid) -> Result<bool, EnrollmentPersistenceError>;

    /// List active enrollments with student and lesson joins resolved.
    async fn list_active(
        &self,
        page: PageRequest,
    ) -> Result<PageOf<EnrollmentDetail>, EnrollmentPersistenceError>;

    /// List a student's active enrollments with their lessons.
    async fn list_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<EnrollmentWithLesson>, EnrollmentPersistenceError>;

    /// List a lesson's active enrollments with their students.
    async fn list_for_lesson(
        &self,
        lesson_id: Uuid,
    ) -> Result<Vec<EnrollmentWithStudent>, EnrollmentPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn duplicate_active_formats_message() {
        let err = EnrollmentPersistenceError::duplicate_active("student already enrolled");
        assert!(err.to_string().contains("already enrolled"));
    }
}
