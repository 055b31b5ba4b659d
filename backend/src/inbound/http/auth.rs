//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/auth/register
//! POST /api/auth/login
//! POST /api/auth/logout
//! GET  /api/auth/profile
//! ```

use std::str::FromStr;

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, UserDraft, UserRole};
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::schemas::UserBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_date, FieldName};

/// Request payload for account registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[schema(format = "date", example = "1999-04-21")]
    pub date_of_birth: String,
    /// Defaults to `student` when absent.
    pub role: Option<String>,
}

/// Request payload for login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    pub email: String,
    pub password: String,
}

/// Response payload carrying the caller's account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserBody,
}

/// Response payload for logout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponseBody {
    pub success: bool,
    pub message: String,
}

fn parse_register_body(body: RegisterRequestBody) -> Result<(UserDraft, String), Error> {
    let role = match body.role.as_deref() {
        None => UserRole::Student,
        Some(raw) => UserRole::from_str(raw)
            .map_err(|err| Error::invalid_request(err.to_string()))?,
    };
    let draft = UserDraft {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        date_of_birth: parse_date(&body.date_of_birth, FieldName::new("dateOfBirth"))?,
        role,
    };
    Ok((draft, body.password))
}

/// Register a new account and start a session for it.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestBody,
    responses(
        (status = 201, description = "Account registered", body = AuthResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 503, description = "Service unavailable", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequestBody>,
) -> ApiResult<(web::Json<AuthResponseBody>, actix_web::http::StatusCode)> {
    let (draft, password) = parse_register_body(payload.into_inner())?;
    let user = state.auth.register(draft, &password).await?;
    session.persist_user(&user)?;

    Ok((
        web::Json(AuthResponseBody {
            success: true,
            message: Some("Registration successful".to_owned()),
            user: UserBody::from(user),
        }),
        actix_web::http::StatusCode::CREATED,
    ))
}

/// Verify credentials and start a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError),
        (status = 503, description = "Service unavailable", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<web::Json<AuthResponseBody>> {
    let body = payload.into_inner();
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::from(Error::invalid_request(
            "Email and password are required",
        )));
    }

    let user = state.auth.login(&body.email, &body.password).await?;
    session.persist_user(&user)?;

    Ok(web::Json(AuthResponseBody {
        success: true,
        message: Some("Login successful".to_owned()),
        user: UserBody::from(user),
    }))
}

/// End the caller's session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = LogoutResponseBody)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security(("SessionCookie" = []))
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<web::Json<LogoutResponseBody>> {
    session.purge();
    Ok(web::Json(LogoutResponseBody {
        success: true,
        message: "Logout successful".to_owned(),
    }))
}

/// Return the authenticated caller's account.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Caller's account", body = AuthResponseBody),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Account missing", body = ApiError)
    ),
    tags = ["auth"],
    operation_id = "authProfile",
    security(("SessionCookie" = []))
)]
#[get("/auth/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AuthResponseBody>> {
    let caller = session.require_user()?;
    let user = state.auth.profile(caller.id).await?;

    Ok(web::Json(AuthResponseBody {
        success: true,
        message: None,
        user: UserBody::from(user),
    }))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
