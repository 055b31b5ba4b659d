//! Domain entities, ports, and services.
//!
//! Types here are transport and storage agnostic. Inbound adapters call the
//! driving ports (`AuthService`, `StudentService`, `LessonService`,
//! `EnrollmentService`); outbound adapters implement the repository ports.

pub mod enrollment;
pub mod error;
pub mod lesson;
pub mod password;
pub mod ports;
pub mod user;

mod auth_service;
mod enrollment_service;
mod lesson_service;
mod student_service;

pub use self::auth_service::AuthServiceImpl;
pub use self::enrollment::{
    Enrollment, EnrollmentDetail, EnrollmentStatus, EnrollmentWithLesson, EnrollmentWithStudent,
    LessonRoster, LessonSummary, StudentSummary, UnknownEnrollmentStatus,
};
pub use self::enrollment_service::EnrollmentServiceImpl;
pub use self::error::{Error, ErrorCode};
pub use self::lesson::{
    Lesson, LessonDraft, LessonStats, LessonUpdate, LessonValidationError, DEFAULT_MAX_CAPACITY,
};
pub use self::lesson_service::LessonServiceImpl;
pub use self::student_service::StudentServiceImpl;
pub use self::user::{
    normalized_email, validated_password, ProfileUpdate, StudentUpdate, User, UserDraft, UserRole,
    UserValidationError,
};
