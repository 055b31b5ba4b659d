//! Enrollment administration HTTP handlers.
//!
//! ```text
//! POST   /api/admin/enrollments
//! GET    /api/admin/enrollments
//! GET    /api/admin/enrollments/student/{studentId}
//! GET    /api/admin/enrollments/lesson/{lessonId}
//! DELETE /api/admin/enrollments/{id}
//! ```

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use pagination::PageRequest;

use crate::domain::{LessonRoster, StudentSummary};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::schemas::{
    EnrollmentDetailBody, EnrollmentWithLessonBody, EnrollmentWithStudentBody, PaginationBody,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::students::DeletedResponseBody;
use crate::inbound::http::validation::{parse_uuid, FieldName, PageQuery};

/// Request payload for enrolling a student.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequestBody {
    #[schema(format = "uuid")]
    pub student_id: String,
    #[schema(format = "uuid")]
    pub lesson_id: String,
}

/// Response payload carrying a single enrollment with joins resolved.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponseBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub enrollment: EnrollmentDetailBody,
}

/// Response payload for a page of enrollments.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentListResponseBody {
    pub success: bool,
    pub enrollments: Vec<EnrollmentDetailBody>,
    pub pagination: PaginationBody,
}

/// Response payload for a student's enrollments.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentEnrollmentsResponseBody {
    pub success: bool,
    pub student: StudentSummary,
    pub enrollments: Vec<EnrollmentWithLessonBody>,
}

/// Response payload for a lesson's roster.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonEnrollmentsResponseBody {
    pub success: bool,
    pub lesson: LessonRoster,
    pub enrollments: Vec<EnrollmentWithStudentBody>,
}

/// Enroll a student in a lesson.
#[utoipa::path(
    post,
    path = "/api/admin/enrollments",
    request_body = EnrollRequestBody,
    responses(
        (status = 201, description = "Student enrolled", body = EnrollmentResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Student or lesson not found", body = ApiError),
        (status = 409, description = "Lesson full or already enrolled", body = ApiError)
    ),
    tags = ["admin-enrollments"],
    operation_id = "enrollStudent",
    security(("SessionCookie" = []))
)]
#[post("/admin/enrollments")]
pub async fn enroll_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EnrollRequestBody>,
) -> ApiResult<(web::Json<EnrollmentResponseBody>, StatusCode)> {
    session.require_admin()?;
    let body = payload.into_inner();
    let student_id = parse_uuid(&body.student_id, FieldName::new("studentId"))?;
    let lesson_id = parse_uuid(&body.lesson_id, FieldName::new("lessonId"))?;

    let detail = state.enrollments.enroll(student_id, lesson_id).await?;

    Ok((
        web::Json(EnrollmentResponseBody {
            success: true,
            message: Some("Student enrolled successfully".to_owned()),
            enrollment: EnrollmentDetailBody::from(detail),
        }),
        StatusCode::CREATED,
    ))
}

/// Page through active enrollments.
#[utoipa::path(
    get,
    path = "/api/admin/enrollments",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of enrollments", body = EnrollmentListResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["admin-enrollments"],
    operation_id = "listEnrollments",
    security(("SessionCookie" = []))
)]
#[get("/admin/enrollments")]
pub async fn list_enrollments(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<EnrollmentListResponseBody>> {
    session.require_admin()?;
    let page = PageRequest::from_query(query.page, query.limit);
    let (enrollments, info) = state.enrollments.list(page).await?;

    Ok(web::Json(EnrollmentListResponseBody {
        success: true,
        enrollments: enrollments
            .into_iter()
            .map(EnrollmentDetailBody::from)
            .collect(),
        pagination: PaginationBody::from(info),
    }))
}

/// List a student's active enrollments.
#[utoipa::path(
    get,
    path = "/api/admin/enrollments/student/{studentId}",
    params(("studentId" = Uuid, Path, description = "Student id")),
    responses(
        (status = 200, description = "The student's enrollments", body = StudentEnrollmentsResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Student not found", body = ApiError)
    ),
    tags = ["admin-enrollments"],
    operation_id = "studentEnrollments",
    security(("SessionCookie" = []))
)]
#[get("/admin/enrollments/student/{student_id}")]
pub async fn student_enrollments(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<StudentEnrollmentsResponseBody>> {
    session.require_admin()?;
    let view = state.enrollments.student_lessons(path.into_inner()).await?;

    Ok(web::Json(StudentEnrollmentsResponseBody {
        success: true,
        student: view.student,
        enrollments: view
            .enrollments
            .into_iter()
            .map(EnrollmentWithLessonBody::from)
            .collect(),
    }))
}

/// List a lesson's active roster.
#[utoipa::path(
    get,
    path = "/api/admin/enrollments/lesson/{lessonId}",
    params(("lessonId" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "The lesson's roster", body = LessonEnrollmentsResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Lesson not found", body = ApiError)
    ),
    tags = ["admin-enrollments"],
    operation_id = "lessonEnrollments",
    security(("SessionCookie" = []))
)]
#[get("/admin/enrollments/lesson/{lesson_id}")]
pub async fn lesson_enrollments(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<LessonEnrollmentsResponseBody>> {
    session.require_admin()?;
    let view = state.enrollments.lesson_students(path.into_inner()).await?;

    Ok(web::Json(LessonEnrollmentsResponseBody {
        success: true,
        lesson: view.lesson,
        enrollments: view
            .enrollments
            .into_iter()
            .map(EnrollmentWithStudentBody::from)
            .collect(),
    }))
}

/// Drop an enrollment and release its seat.
#[utoipa::path(
    delete,
    path = "/api/admin/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment removed", body = DeletedResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Enrollment not found", body = ApiError)
    ),
    tags = ["admin-enrollments"],
    operation_id = "deleteEnrollment",
    security(("SessionCookie" = []))
)]
#[delete("/admin/enrollments/{id}")]
pub async fn delete_enrollment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<DeletedResponseBody>> {
    session.require_admin()?;
    state.enrollments.delete(path.into_inner()).await?;

    Ok(web::Json(DeletedResponseBody {
        success: true,
        message: "Enrollment removed successfully".to_owned(),
    }))
}

#[cfg(test)]
#[path = "enrollments_tests.rs"]
mod tests;
