//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;

use chrono::NaiveDate;

use crate::domain::ports::{
    MockAuthService, MockEnrollmentService, MockLessonService, MockStudentService,
};
use crate::domain::{User, UserDraft, UserRole};
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// plain-HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Fixture account with the given role for session tests.
pub fn fixture_user(role: UserRole) -> User {
    User::new(UserDraft {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).expect("valid date"),
        role,
    })
    .expect("valid draft")
}

/// Bundle mock services into an [`HttpState`] for handler tests.
pub fn mock_state(
    auth: MockAuthService,
    students: MockStudentService,
    lessons: MockLessonService,
    enrollments: MockEnrollmentService,
) -> HttpState {
    HttpState::new(
        Arc::new(auth),
        Arc::new(students),
        Arc::new(lessons),
        Arc::new(enrollments),
    )
}
