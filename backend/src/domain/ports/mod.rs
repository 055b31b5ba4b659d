//! Domain ports: traits the domain depends on (driven) and exposes (driving).

mod macros;

mod auth_service;
mod enrollment_repository;
mod enrollment_service;
mod lesson_repository;
mod lesson_service;
mod student_repository;
mod student_service;

pub(crate) use macros::define_port_error;

pub use auth_service::AuthService;
#[cfg(test)]
pub use auth_service::MockAuthService;
pub use enrollment_repository::{EnrollmentPersistenceError, EnrollmentRepository};
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
pub use enrollment_service::{EnrollmentService, LessonStudentsView, StudentLessonsView};
#[cfg(test)]
pub use enrollment_service::MockEnrollmentService;
pub use lesson_repository::{LessonPersistenceError, LessonRepository, SeatAcquisition};
#[cfg(test)]
pub use lesson_repository::MockLessonRepository;
pub use lesson_service::LessonService;
#[cfg(test)]
pub use lesson_service::MockLessonService;
pub use student_repository::{StudentPersistenceError, StudentRepository, UserCredentials};
#[cfg(test)]
pub use student_repository::MockStudentRepository;
pub use student_service::StudentService;
#[cfg(test)]
pub use student_service::MockStudentService;

/// One page of rows plus the total row count for the whole result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    pub total: u64,
}
