//! Enrollment domain service.
//!
//! Enrollment claims a seat through a conditional update before the
//! enrollment row is written, so two racing requests for the last seat can
//! never both succeed. If the row insert then fails, the claimed seat is
//! released before the error is surfaced.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageInfo, PageRequest};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    EnrollmentPersistenceError, EnrollmentRepository, EnrollmentService,
    LessonPersistenceError, LessonRepository, LessonStudentsView, SeatAcquisition,
    StudentPersistenceError, StudentRepository, StudentLessonsView,
};
use crate::domain::{
    Enrollment, EnrollmentDetail, EnrollmentWithLesson, Error, LessonRoster, LessonSummary,
    StudentSummary,
};

fn map_student_error(error: StudentPersistenceError) -> Error {
    match error {
        StudentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("student repository unavailable: {message}"))
        }
        StudentPersistenceError::Query { message }
        | StudentPersistenceError::DuplicateEmail { message } => {
            Error::internal(format!("student repository error: {message}"))
        }
    }
}

fn map_lesson_error(error: LessonPersistenceError) -> Error {
    match error {
        LessonPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("lesson repository unavailable: {message}"))
        }
        LessonPersistenceError::Query { message }
        | LessonPersistenceError::DuplicateName { message }
        | LessonPersistenceError::DuplicateCode { message } => {
            Error::internal(format!("lesson repository error: {message}"))
        }
    }
}

fn map_enrollment_error(error: EnrollmentPersistenceError) -> Error {
    match error {
        EnrollmentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("enrollment repository unavailable: {message}"))
        }
        EnrollmentPersistenceError::Query { message }
        | EnrollmentPersistenceError::DuplicateActive { message } => {
            Error::internal(format!("enrollment repository error: {message}"))
        }
    }
}

/// Enrollment workflows spanning students, lessons, and enrollments.
#[derive(Clone)]
pub struct EnrollmentServiceImpl<S, L, E> {
    students: Arc<S>,
    lessons: Arc<L>,
    enrollments: Arc<E>,
}

impl<S, L, E> EnrollmentServiceImpl<S, L, E> {
    /// Create the service with its three repositories.
    pub fn new(students: Arc<S>, lessons: Arc<L>, enrollments: Arc<E>) -> Self {
        Self {
            students,
            lessons,
            enrollments,
        }
    }
}

impl<S, L, E> EnrollmentServiceImpl<S, L, E>
where
    L: LessonRepository,
{
    /// Return a claimed seat after a failed insert or a drop. A failed
    /// release is logged rather than surfaced: the caller's outcome is
    /// already decided and the count self-corrects on the next release.
    async fn release_seat_best_effort(&self, lesson_id: Uuid) {
        if let Err(err) = self.lessons.release_seat(lesson_id).await {
            warn!(%lesson_id, error = %err, "failed to release lesson seat");
        }
    }
}

#[async_trait]
impl<S, L, E> EnrollmentService for EnrollmentServiceImpl<S, L, E>
where
    S: StudentRepository,
    L: LessonRepository,
    E: EnrollmentRepository,
{
    async fn enroll(&self, student_id: Uuid, lesson_id: Uuid) -> Result<EnrollmentDetail, Error> {
        let student = self
            .students
            .find_student(student_id)
            .await
            .map_err(map_student_error)?
            .ok_or_else(|| Error::not_found("Student not found"))?;

        match self
            .lessons
            .acquire_seat(lesson_id)
            .await
            .map_err(map_lesson_error)?
        {
            SeatAcquisition::Acquired => {}
            SeatAcquisition::Full => {
                return Err(Error::capacity_exceeded("Lesson is full"));
            }
            SeatAcquisition::MissingOrInactive => {
                return Err(Error::not_found("Lesson not found or inactive"));
            }
        }

        let enrollment = Enrollment::new(student_id, lesson_id);
        if let Err(err) = self.enrollments.insert_active(&enrollment).await {
            self.release_seat_best_effort(lesson_id).await;
            return Err(match err {
                EnrollmentPersistenceError::DuplicateActive { .. } => {
                    Error::duplicate_enrollment("Student is already enrolled in this lesson")
                }
                other => map_enrollment_error(other),
            });
        }

        let lesson = self
            .lessons
            .find_by_id(lesson_id)
            .await
            .map_err(map_lesson_error)?
            .ok_or_else(|| {
                Error::internal(format!("lesson {lesson_id} missing after enrollment"))
            })?;

        Ok(EnrollmentDetail {
            enrollment,
            student: StudentSummary::from(&student),
            lesson: LessonSummary::from(&lesson),
        })
    }

    async fn drop_for_student(&self, student_id: Uuid, lesson_id: Uuid) -> Result<(), Error> {
        let enrollment = self
            .enrollments
            .find_active(student_id, lesson_id)
            .await
            .map_err(map_enrollment_error)?
            .ok_or_else(|| Error::not_found("You are not enrolled in this lesson"))?;

        let dropped = self
            .enrollments
            .mark_dropped(enrollment.id)
            .await
            .map_err(map_enrollment_error)?;
        if !dropped {
            // Lost a race with another drop; the seat was already released.
            return Err(Error::not_found("You are not enrolled in this lesson"));
        }

        self.release_seat_best_effort(lesson_id).await;
        Ok(())
    }

    async fn delete(&self, enrollment_id: Uuid) -> Result<(), Error> {
        let enrollment = self
            .enrollments
            .find_by_id(enrollment_id)
            .await
            .map_err(map_enrollment_error)?
            .filter(Enrollment::is_active)
            .ok_or_else(|| Error::not_found("Enrollment not found"))?;

        let dropped = self
            .enrollments
            .mark_dropped(enrollment.id)
            .await
            .map_err(map_enrollment_error)?;
        if !dropped {
            return Err(Error::not_found("Enrollment not found"));
        }

        self.release_seat_best_effort(enrollment.lesson_id).await;
        Ok(())
    }

    async fn list(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<EnrollmentDetail>, PageInfo), Error> {
        let result = self
            .enrollments
            .list_active(page)
            .await
            .map_err(map_enrollment_error)?;
        let info = PageInfo::new(page, result.total);
        Ok((result.items, info))
    }

    async fn student_lessons(&self, student_id: Uuid) -> Result<StudentLessonsView, Error> {
        let student = self
            .students
            .find_student(student_id)
            .await
            .map_err(map_student_error)?
            .ok_or_else(|| Error::not_found("Student not found"))?;

        let enrollments = self
            .enrollments
            .list_for_student(student_id)
            .await
            .map_err(map_enrollment_error)?;

        Ok(StudentLessonsView {
            student: StudentSummary::from(&student),
            enrollments,
        })
    }

    async fn lesson_students(&self, lesson_id: Uuid) -> Result<LessonStudentsView, Error> {
        let lesson = self
            .lessons
            .find_by_id(lesson_id)
            .await
            .map_err(map_lesson_error)?
            .ok_or_else(|| Error::not_found("Lesson not found"))?;

        let enrollments = self
            .enrollments
            .list_for_lesson(lesson_id)
            .await
            .map_err(map_enrollment_error)?;

        Ok(LessonStudentsView {
            lesson: LessonRoster::from(&lesson),
            enrollments,
        })
    }

    async fn my_lessons(&self, student_id: Uuid) -> Result<Vec<EnrollmentWithLesson>, Error> {
        self.enrollments
            .list_for_student(student_id)
            .await
            .map_err(map_enrollment_error)
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;
