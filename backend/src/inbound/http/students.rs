//! Student administration HTTP handlers.
//!
//! ```text
//! POST   /api/admin/students
//! GET    /api/admin/students
//! GET    /api/admin/students/{id}
//! PUT    /api/admin/students/{id}
//! DELETE /api/admin/students/{id}
//! ```

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use pagination::PageRequest;

use crate::domain::{Error, StudentUpdate, UserDraft, UserRole};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::schemas::{PaginationBody, UserBody};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_date, FieldName, ListQuery};

/// Request payload for creating a student account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequestBody {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[schema(format = "date", example = "2001-09-03")]
    pub date_of_birth: String,
}

/// Request payload for replacing a student's editable fields.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequestBody {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[schema(format = "date", example = "2001-09-03")]
    pub date_of_birth: String,
}

/// Response payload carrying a single student.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponseBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub student: UserBody,
}

/// Response payload for a page of students.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentListResponseBody {
    pub success: bool,
    pub students: Vec<UserBody>,
    pub pagination: PaginationBody,
}

/// Response payload for a deletion acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponseBody {
    pub success: bool,
    pub message: String,
}

fn parse_create_body(body: CreateStudentRequestBody) -> Result<(UserDraft, String), Error> {
    let draft = UserDraft {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        date_of_birth: parse_date(&body.date_of_birth, FieldName::new("dateOfBirth"))?,
        role: UserRole::Student,
    };
    Ok((draft, body.password))
}

fn parse_update_body(body: UpdateStudentRequestBody) -> Result<StudentUpdate, Error> {
    let date_of_birth = parse_date(&body.date_of_birth, FieldName::new("dateOfBirth"))?;
    StudentUpdate::new(&body.first_name, &body.last_name, &body.email, date_of_birth)
        .map_err(|err| Error::invalid_request(err.to_string()))
}

/// Create a student account.
#[utoipa::path(
    post,
    path = "/api/admin/students",
    request_body = CreateStudentRequestBody,
    responses(
        (status = 201, description = "Student created", body = StudentResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["admin-students"],
    operation_id = "createStudent",
    security(("SessionCookie" = []))
)]
#[post("/admin/students")]
pub async fn create_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateStudentRequestBody>,
) -> ApiResult<(web::Json<StudentResponseBody>, StatusCode)> {
    session.require_admin()?;
    let (draft, password) = parse_create_body(payload.into_inner())?;
    let student = state.students.create(draft, &password).await?;

    Ok((
        web::Json(StudentResponseBody {
            success: true,
            message: Some("Student created successfully".to_owned()),
            student: UserBody::from(student),
        }),
        StatusCode::CREATED,
    ))
}

/// Page through active students.
#[utoipa::path(
    get,
    path = "/api/admin/students",
    params(ListQuery),
    responses(
        (status = 200, description = "A page of students", body = StudentListResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError)
    ),
    tags = ["admin-students"],
    operation_id = "listStudents",
    security(("SessionCookie" = []))
)]
#[get("/admin/students")]
pub async fn list_students(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<StudentListResponseBody>> {
    session.require_admin()?;
    let page = PageRequest::from_query(query.page, query.limit);
    let (students, info) = state.students.list(page, query.search_term()).await?;

    Ok(web::Json(StudentListResponseBody {
        success: true,
        students: students.into_iter().map(UserBody::from).collect(),
        pagination: PaginationBody::from(info),
    }))
}

/// Fetch a single student.
#[utoipa::path(
    get,
    path = "/api/admin/students/{id}",
    params(("id" = Uuid, Path, description = "Student id")),
    responses(
        (status = 200, description = "The student", body = StudentResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Student not found", body = ApiError)
    ),
    tags = ["admin-students"],
    operation_id = "getStudent",
    security(("SessionCookie" = []))
)]
#[get("/admin/students/{id}")]
pub async fn get_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<StudentResponseBody>> {
    session.require_admin()?;
    let student = state.students.get(path.into_inner()).await?;

    Ok(web::Json(StudentResponseBody {
        success: true,
        message: None,
        student: UserBody::from(student),
    }))
}

/// Replace a student's editable fields.
#[utoipa::path(
    put,
    path = "/api/admin/students/{id}",
    params(("id" = Uuid, Path, description = "Student id")),
    request_body = UpdateStudentRequestBody,
    responses(
        (status = 200, description = "Student updated", body = StudentResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Student not found", body = ApiError)
    ),
    tags = ["admin-students"],
    operation_id = "updateStudent",
    security(("SessionCookie" = []))
)]
#[put("/admin/students/{id}")]
pub async fn update_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateStudentRequestBody>,
) -> ApiResult<web::Json<StudentResponseBody>> {
    session.require_admin()?;
    let update = parse_update_body(payload.into_inner())?;
    let student = state.students.update(path.into_inner(), update).await?;

    Ok(web::Json(StudentResponseBody {
        success: true,
        message: Some("Student updated successfully".to_owned()),
        student: UserBody::from(student),
    }))
}

/// Deactivate a student account.
#[utoipa::path(
    delete,
    path = "/api/admin/students/{id}",
    params(("id" = Uuid, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student deleted", body = DeletedResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Student not found", body = ApiError)
    ),
    tags = ["admin-students"],
    operation_id = "deleteStudent",
    security(("SessionCookie" = []))
)]
#[delete("/admin/students/{id}")]
pub async fn delete_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<DeletedResponseBody>> {
    session.require_admin()?;
    state.students.delete(path.into_inner()).await?;

    Ok(web::Json(DeletedResponseBody {
        success: true,
        message: "Student deleted successfully".to_owned(),
    }))
}

#[cfg(test)]
#[path = "students_tests.rs"]
mod tests;
