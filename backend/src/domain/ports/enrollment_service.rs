//! Driving port for enrollment workflows.

use async_trait::async_trait;
use pagination::{PageInfo, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    EnrollmentDetail, EnrollmentWithLesson, EnrollmentWithStudent, Error, LessonRoster,
    StudentSummary,
};

/// A student's active enrollments with the student header resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentLessonsView {
    pub student: StudentSummary,
    pub enrollments: Vec<EnrollmentWithLesson>,
}

/// A lesson's active roster with seat usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonStudentsView {
    pub lesson: LessonRoster,
    pub enrollments: Vec<EnrollmentWithStudent>,
}

/// Enrollment operations exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Enroll a student in a lesson, claiming a seat atomically.
    async fn enroll(&self, student_id: Uuid, lesson_id: Uuid) -> Result<EnrollmentDetail, Error>;

    /// Drop the caller's active enrollment in a lesson and release its seat.
    async fn drop_for_student(&self, student_id: Uuid, lesson_id: Uuid) -> Result<(), Error>;

    /// Drop an active enrollment by id and release its seat.
    async fn delete(&self, enrollment_id: Uuid) -> Result<(), Error>;

    /// Page through active enrollments with both joins resolved.
    async fn list(&self, page: PageRequest)
        -> Result<(Vec<EnrollmentDetail>, PageInfo), Error>;

    /// A student's active enrollments, for the admin view.
    async fn student_lessons(&self, student_id: Uuid) -> Result<StudentLessonsView, Error>;

    /// A lesson's active roster, for the admin view.
    async fn lesson_students(&self, lesson_id: Uuid) -> Result<LessonStudentsView, Error>;

    /// The calling student's own active enrollments.
    async fn my_lessons(&self, student_id: Uuid) -> Result<Vec<EnrollmentWithLesson>, Error>;
}
