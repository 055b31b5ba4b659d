//! Student self-service HTTP handlers.
//!
//! ```text
//! GET    /api/student/profile
//! PUT    /api/student/profile
//! GET    /api/student/lessons/available
//! GET    /api/student/lessons/my
//! POST   /api/student/enroll
//! DELETE /api/student/drop/{lessonId}
//! ```

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use pagination::PageRequest;

use crate::domain::{Error, ProfileUpdate};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::schemas::{
    EnrollmentDetailBody, EnrollmentWithLessonBody, LessonBody, PaginationBody, UserBody,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::students::DeletedResponseBody;
use crate::inbound::http::validation::{parse_date, parse_uuid, FieldName, ListQuery};

/// Request payload for updating the caller's own profile.
///
/// Email changes are not allowed through this path.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequestBody {
    pub first_name: String,
    pub last_name: String,
    #[schema(format = "date", example = "2001-09-03")]
    pub date_of_birth: String,
}

/// Request payload for self-enrollment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelfEnrollRequestBody {
    #[schema(format = "uuid")]
    pub lesson_id: String,
}

/// Response payload carrying the caller's profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponseBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub student: UserBody,
}

/// Response payload listing lessons open to the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableLessonsResponseBody {
    pub success: bool,
    pub lessons: Vec<LessonBody>,
    pub pagination: PaginationBody,
}

/// Response payload listing the caller's active enrollments.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyLessonsResponseBody {
    pub success: bool,
    pub enrollments: Vec<EnrollmentWithLessonBody>,
}

/// Response payload for self-enrollment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelfEnrollResponseBody {
    pub success: bool,
    pub message: String,
    pub enrollment: EnrollmentDetailBody,
}

/// Return the calling student's profile.
#[utoipa::path(
    get,
    path = "/api/student/profile",
    responses(
        (status = 200, description = "Caller's profile", body = ProfileResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Student not found", body = ApiError)
    ),
    tags = ["student"],
    operation_id = "studentProfile",
    security(("SessionCookie" = []))
)]
#[get("/student/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponseBody>> {
    let caller = session.require_student()?;
    let student = state.students.profile(caller.id).await?;

    Ok(web::Json(ProfileResponseBody {
        success: true,
        message: None,
        student: UserBody::from(student),
    }))
}

/// Replace the calling student's profile fields.
#[utoipa::path(
    put,
    path = "/api/student/profile",
    request_body = UpdateProfileRequestBody,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["student"],
    operation_id = "updateStudentProfile",
    security(("SessionCookie" = []))
)]
#[put("/student/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequestBody>,
) -> ApiResult<web::Json<ProfileResponseBody>> {
    let caller = session.require_student()?;
    let body = payload.into_inner();
    let date_of_birth = parse_date(&body.date_of_birth, FieldName::new("dateOfBirth"))?;
    let update = ProfileUpdate::new(&body.first_name, &body.last_name, date_of_birth)
        .map_err(|err| ApiError::from(Error::invalid_request(err.to_string())))?;
    let student = state.students.update_profile(caller.id, update).await?;

    Ok(web::Json(ProfileResponseBody {
        success: true,
        message: Some("Profile updated successfully".to_owned()),
        student: UserBody::from(student),
    }))
}

/// Page through active lessons the caller is not already enrolled in.
#[utoipa::path(
    get,
    path = "/api/student/lessons/available",
    params(ListQuery),
    responses(
        (status = 200, description = "Lessons open to the caller", body = AvailableLessonsResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["student"],
    operation_id = "availableLessons",
    security(("SessionCookie" = []))
)]
#[get("/student/lessons/available")]
pub async fn available_lessons(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<AvailableLessonsResponseBody>> {
    let caller = session.require_student()?;
    let page = PageRequest::from_query(query.page, query.limit);
    let (lessons, info) = state
        .lessons
        .available_for_student(caller.id, page, query.search_term())
        .await?;

    Ok(web::Json(AvailableLessonsResponseBody {
        success: true,
        lessons: lessons.into_iter().map(LessonBody::from).collect(),
        pagination: PaginationBody::from(info),
    }))
}

/// List the caller's active enrollments.
#[utoipa::path(
    get,
    path = "/api/student/lessons/my",
    responses(
        (status = 200, description = "Caller's enrollments", body = MyLessonsResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["student"],
    operation_id = "myLessons",
    security(("SessionCookie" = []))
)]
#[get("/student/lessons/my")]
pub async fn my_lessons(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MyLessonsResponseBody>> {
    let caller = session.require_student()?;
    let enrollments = state.enrollments.my_lessons(caller.id).await?;

    Ok(web::Json(MyLessonsResponseBody {
        success: true,
        enrollments: enrollments
            .into_iter()
            .map(EnrollmentWithLessonBody::from)
            .collect(),
    }))
}

/// Enroll the caller in a lesson.
#[utoipa::path(
    post,
    path = "/api/student/enroll",
    request_body = SelfEnrollRequestBody,
    responses(
        (status = 201, description = "Enrolled", body = SelfEnrollResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Lesson not found or inactive", body = ApiError),
        (status = 409, description = "Lesson full or already enrolled", body = ApiError)
    ),
    tags = ["student"],
    operation_id = "selfEnroll",
    security(("SessionCookie" = []))
)]
#[post("/student/enroll")]
pub async fn enroll(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SelfEnrollRequestBody>,
) -> ApiResult<(web::Json<SelfEnrollResponseBody>, StatusCode)> {
    let caller = session.require_student()?;
    let lesson_id = parse_uuid(&payload.lesson_id, FieldName::new("lessonId"))?;
    let detail = state.enrollments.enroll(caller.id, lesson_id).await?;

    Ok((
        web::Json(SelfEnrollResponseBody {
            success: true,
            message: "Enrolled successfully".to_owned(),
            enrollment: EnrollmentDetailBody::from(detail),
        }),
        StatusCode::CREATED,
    ))
}

/// Drop the caller's active enrollment in a lesson.
#[utoipa::path(
    delete,
    path = "/api/student/drop/{lessonId}",
    params(("lessonId" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Lesson dropped", body = DeletedResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Not enrolled in this lesson", body = ApiError)
    ),
    tags = ["student"],
    operation_id = "dropLesson",
    security(("SessionCookie" = []))
)]
#[delete("/student/drop/{lesson_id}")]
pub async fn drop_lesson(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<DeletedResponseBody>> {
    let caller = session.require_student()?;
    state
        .enrollments
        .drop_for_student(caller.id, path.into_inner())
        .await?;

    Ok(web::Json(DeletedResponseBody {
        success: true,
        message: "Lesson dropped successfully".to_owned(),
    }))
}

#[cfg(test)]
#[path = "student_self_tests.rs"]
mod tests;
