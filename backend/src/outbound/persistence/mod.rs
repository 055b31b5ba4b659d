//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! The adapters are thin translators: Diesel row structs (`models`) and table
//! definitions (`schema`) stay internal, and every database failure is mapped
//! to a typed persistence error before it crosses into the domain.

mod diesel_enrollment_repository;
mod diesel_error_mapping;
mod diesel_lesson_repository;
mod diesel_student_repository;
mod models;
mod pool;
mod schema;

pub use diesel_enrollment_repository::DieselEnrollmentRepository;
pub use diesel_lesson_repository::DieselLessonRepository;
pub use diesel_student_repository::DieselStudentRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
