//! Builders wiring repository adapters into the domain services.

use std::sync::Arc;

use actix_web::web;

use backend::domain::{
    AuthServiceImpl, EnrollmentServiceImpl, LessonServiceImpl, StudentServiceImpl,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DbPool, DieselEnrollmentRepository, DieselLessonRepository, DieselStudentRepository,
};

/// Build the HTTP state with database-backed repositories behind every port.
pub(super) fn build_http_state(pool: &DbPool) -> web::Data<HttpState> {
    let students = Arc::new(DieselStudentRepository::new(pool.clone()));
    let lessons = Arc::new(DieselLessonRepository::new(pool.clone()));
    let enrollments = Arc::new(DieselEnrollmentRepository::new(pool.clone()));

    let auth = Arc::new(AuthServiceImpl::new(Arc::clone(&students)));
    let student_service = Arc::new(StudentServiceImpl::new(Arc::clone(&students)));
    let lesson_service = Arc::new(LessonServiceImpl::new(Arc::clone(&lessons)));
    let enrollment_service = Arc::new(EnrollmentServiceImpl::new(students, lessons, enrollments));

    web::Data::new(HttpState::new(
        auth,
        student_service,
        lesson_service,
        enrollment_service,
    ))
}
