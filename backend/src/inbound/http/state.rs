//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only on
//! the driving ports and stay testable with mocks.

use std::sync::Arc;

use crate::domain::ports::{AuthService, EnrollmentService, LessonService, StudentService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub students: Arc<dyn StudentService>,
    pub lessons: Arc<dyn LessonService>,
    pub enrollments: Arc<dyn EnrollmentService>,
}

impl HttpState {
    /// Bundle the four driving ports behind one handle.
    pub fn new(
        auth: Arc<dyn AuthService>,
        students: Arc<dyn StudentService>,
        lessons: Arc<dyn LessonService>,
        enrollments: Arc<dyn EnrollmentService>,
    ) -> Self {
        Self {
            auth,
            students,
            lessons,
            enrollments,
        }
    }
}
