//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. It
//! registers every HTTP endpoint from the inbound layer, the shared response
//! body schemas, and the session cookie security scheme. The generated
//! specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::error::ApiError;
use crate::inbound::http::schemas::{
    EnrollmentBody, EnrollmentDetailBody, EnrollmentWithLessonBody, EnrollmentWithStudentBody,
    LessonBody, LessonStatsBody, PaginationBody, UserBody,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Enrollment backend API",
        description = "HTTP interface for student, lesson, and enrollment management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::profile,
        crate::inbound::http::students::create_student,
        crate::inbound::http::students::list_students,
        crate::inbound::http::students::get_student,
        crate::inbound::http::students::update_student,
        crate::inbound::http::students::delete_student,
        crate::inbound::http::lessons::create_lesson,
        crate::inbound::http::lessons::list_lessons,
        crate::inbound::http::lessons::lesson_stats,
        crate::inbound::http::lessons::get_lesson,
        crate::inbound::http::lessons::update_lesson,
        crate::inbound::http::lessons::delete_lesson,
        crate::inbound::http::enrollments::enroll_student,
        crate::inbound::http::enrollments::list_enrollments,
        crate::inbound::http::enrollments::student_enrollments,
        crate::inbound::http::enrollments::lesson_enrollments,
        crate::inbound::http::enrollments::delete_enrollment,
        crate::inbound::http::student_self::get_profile,
        crate::inbound::http::student_self::update_profile,
        crate::inbound::http::student_self::available_lessons,
        crate::inbound::http::student_self::my_lessons,
        crate::inbound::http::student_self::enroll,
        crate::inbound::http::student_self::drop_lesson,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        UserBody,
        LessonBody,
        LessonStatsBody,
        EnrollmentBody,
        EnrollmentDetailBody,
        EnrollmentWithLessonBody,
        EnrollmentWithStudentBody,
        PaginationBody,
    )),
    tags(
        (name = "auth", description = "Registration, login, and session management"),
        (name = "admin-students", description = "Student administration"),
        (name = "admin-lessons", description = "Lesson administration"),
        (name = "admin-enrollments", description = "Enrollment administration"),
        (name = "student", description = "Student self-service"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn openapi_registers_session_security_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }

    #[test]
    fn enrollment_list_advertises_page_and_limit_only() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("serializable document");
        let names: Vec<&str> = json["paths"]["/api/admin/enrollments"]["get"]["parameters"]
            .as_array()
            .expect("parameters present")
            .iter()
            .filter_map(|param| param["name"].as_str())
            .collect();

        assert!(names.contains(&"page"));
        assert!(names.contains(&"limit"));
        assert!(!names.contains(&"search"));
    }

    #[test]
    fn openapi_covers_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for expected in [
            "/api/auth/login",
            "/api/admin/students",
            "/api/admin/lessons/stats",
            "/api/admin/enrollments/student/{studentId}",
            "/api/student/enroll",
            "/health/ready",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }
}
