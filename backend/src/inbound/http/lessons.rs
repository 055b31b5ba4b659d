//! Lesson administration HTTP handlers.
//!
//! ```text
//! POST   /api/admin/lessons
//! GET    /api/admin/lessons
//! GET    /api/admin/lessons/stats
//! GET    /api/admin/lessons/{id}
//! PUT    /api/admin/lessons/{id}
//! DELETE /api/admin/lessons/{id}
//! ```

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use pagination::PageRequest;

use crate::domain::{Error, LessonDraft, LessonUpdate};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::schemas::{LessonBody, LessonStatsBody, PaginationBody};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::students::DeletedResponseBody;
use crate::inbound::http::validation::ListQuery;

/// Request payload for creating or replacing a lesson.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonRequestBody {
    pub name: String,
    pub description: Option<String>,
    pub code: String,
    pub credits: i32,
    pub instructor: Option<String>,
    /// Defaults to 50 when absent.
    pub max_capacity: Option<i32>,
}

impl From<LessonRequestBody> for LessonDraft {
    fn from(body: LessonRequestBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            code: body.code,
            credits: body.credits,
            instructor: body.instructor,
            max_capacity: body.max_capacity,
        }
    }
}

/// Response payload carrying a single lesson.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonResponseBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub lesson: LessonBody,
}

/// Response payload for a page of lessons.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonListResponseBody {
    pub success: bool,
    pub lessons: Vec<LessonBody>,
    pub pagination: PaginationBody,
}

/// Response payload for aggregate lesson statistics.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonStatsResponseBody {
    pub success: bool,
    pub stats: LessonStatsBody,
}

/// Create a lesson.
#[utoipa::path(
    post,
    path = "/api/admin/lessons",
    request_body = LessonRequestBody,
    responses(
        (status = 201, description = "Lesson created", body = LessonResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["admin-lessons"],
    operation_id = "createLesson",
    security(("SessionCookie" = []))
)]
#[post("/admin/lessons")]
pub async fn create_lesson(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LessonRequestBody>,
) -> ApiResult<(web::Json<LessonResponseBody>, StatusCode)> {
    session.require_admin()?;
    let lesson = state
        .lessons
        .create(LessonDraft::from(payload.into_inner()))
        .await?;

    Ok((
        web::Json(LessonResponseBody {
            success: true,
            message: Some("Lesson created successfully".to_owned()),
            lesson: LessonBody::from(lesson),
        }),
        StatusCode::CREATED,
    ))
}

/// Page through active lessons.
#[utoipa::path(
    get,
    path = "/api/admin/lessons",
    params(ListQuery),
    responses(
        (status = 200, description = "A page of lessons", body = LessonListResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["admin-lessons"],
    operation_id = "listLessons",
    security(("SessionCookie" = []))
)]
#[get("/admin/lessons")]
pub async fn list_lessons(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<LessonListResponseBody>> {
    session.require_admin()?;
    let page = PageRequest::from_query(query.page, query.limit);
    let (lessons, info) = state.lessons.list(page, query.search_term()).await?;

    Ok(web::Json(LessonListResponseBody {
        success: true,
        lessons: lessons.into_iter().map(LessonBody::from).collect(),
        pagination: PaginationBody::from(info),
    }))
}

/// Aggregate counts across all active lessons.
///
/// Registered ahead of `/admin/lessons/{id}` so `stats` never parses as an
/// id.
#[utoipa::path(
    get,
    path = "/api/admin/lessons/stats",
    responses(
        (status = 200, description = "Aggregate lesson statistics", body = LessonStatsResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["admin-lessons"],
    operation_id = "lessonStats",
    security(("SessionCookie" = []))
)]
#[get("/admin/lessons/stats")]
pub async fn lesson_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<LessonStatsResponseBody>> {
    session.require_admin()?;
    let stats = state.lessons.stats().await?;

    Ok(web::Json(LessonStatsResponseBody {
        success: true,
        stats: LessonStatsBody::from(stats),
    }))
}

/// Fetch a single lesson.
#[utoipa::path(
    get,
    path = "/api/admin/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "The lesson", body = LessonResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Lesson not found", body = ApiError)
    ),
    tags = ["admin-lessons"],
    operation_id = "getLesson",
    security(("SessionCookie" = []))
)]
#[get("/admin/lessons/{id}")]
pub async fn get_lesson(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<LessonResponseBody>> {
    session.require_admin()?;
    let lesson = state.lessons.get(path.into_inner()).await?;

    Ok(web::Json(LessonResponseBody {
        success: true,
        message: None,
        lesson: LessonBody::from(lesson),
    }))
}

/// Replace a lesson's editable fields.
#[utoipa::path(
    put,
    path = "/api/admin/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson id")),
    request_body = LessonRequestBody,
    responses(
        (status = 200, description = "Lesson updated", body = LessonResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Lesson not found", body = ApiError)
    ),
    tags = ["admin-lessons"],
    operation_id = "updateLesson",
    security(("SessionCookie" = []))
)]
#[put("/admin/lessons/{id}")]
pub async fn update_lesson(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<LessonRequestBody>,
) -> ApiResult<web::Json<LessonResponseBody>> {
    session.require_admin()?;
    let update = LessonUpdate::new(LessonDraft::from(payload.into_inner()))
        .map_err(|err| ApiError::from(Error::invalid_request(err.to_string())))?;
    let lesson = state.lessons.update(path.into_inner(), update).await?;

    Ok(web::Json(LessonResponseBody {
        success: true,
        message: Some("Lesson updated successfully".to_owned()),
        lesson: LessonBody::from(lesson),
    }))
}

/// Deactivate a lesson.
#[utoipa::path(
    delete,
    path = "/api/admin/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Lesson deleted", body = DeletedResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Lesson not found", body = ApiError)
    ),
    tags = ["admin-lessons"],
    operation_id = "deleteLesson",
    security(("SessionCookie" = []))
)]
#[delete("/admin/lessons/{id}")]
pub async fn delete_lesson(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<DeletedResponseBody>> {
    session.require_admin()?;
    state.lessons.deactivate(path.into_inner()).await?;

    Ok(web::Json(DeletedResponseBody {
        success: true,
        message: "Lesson deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
#[path = "lessons_tests.rs"]
mod tests;
