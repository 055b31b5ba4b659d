//! Tests for authentication HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App, HttpResponse};
use serde_json::Value;

use super::*;
use crate::domain::ports::{
    MockAuthService, MockEnrollmentService, MockLessonService, MockStudentService,
};
use crate::domain::User;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::test_utils::{fixture_user, mock_state, test_session_middleware};

fn test_app(
    state: HttpState,
    login_as: Option<User>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route(
            "/test/login",
            web::get().to(move |session: SessionContext| {
                let user = login_as.clone();
                async move {
                    let user = user.ok_or_else(|| {
                        ApiError::from(Error::internal("no login fixture configured"))
                    })?;
                    session.persist_user(&user)?;
                    Ok::<_, ApiError>(HttpResponse::Ok().finish())
                }
            }),
        )
        .service(
            web::scope("/api")
                .service(register)
                .service(login)
                .service(logout)
                .service(profile),
        )
}

async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> actix_web::cookie::Cookie<'static> {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::get().uri("/test/login").to_request(),
    )
    .await;
    assert!(res.status().is_success());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

fn state_with_auth(auth: MockAuthService) -> HttpState {
    mock_state(
        auth,
        MockStudentService::new(),
        MockLessonService::new(),
        MockEnrollmentService::new(),
    )
}

#[actix_web::test]
async fn register_creates_account_and_session() {
    let user = fixture_user(UserRole::Student);
    let mut auth = MockAuthService::new();
    auth.expect_register()
        .times(1)
        .return_once(move |_, _| Ok(user));

    let app = actix_test::init_service(test_app(state_with_auth(auth), None)).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "secret1",
                "dateOfBirth": "1990-12-10"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(res
        .response()
        .cookies()
        .any(|cookie| cookie.name() == "session"));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[actix_web::test]
async fn register_rejects_malformed_date() {
    let mut auth = MockAuthService::new();
    auth.expect_register().times(0);

    let app = actix_test::init_service(test_app(state_with_auth(auth), None)).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "secret1",
                "dateOfBirth": "12/10/1990"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn login_requires_email_and_password() {
    let mut auth = MockAuthService::new();
    auth.expect_login().times(0);

    let app = actix_test::init_service(test_app(state_with_auth(auth), None)).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "email": "", "password": "" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Email and password are required");
}

#[actix_web::test]
async fn login_sets_session_cookie() {
    let user = fixture_user(UserRole::Student);
    let mut auth = MockAuthService::new();
    auth.expect_login().times(1).return_once(move |_, _| Ok(user));

    let app = actix_test::init_service(test_app(state_with_auth(auth), None)).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({
                "email": "ada@example.com",
                "password": "secret1"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res
        .response()
        .cookies()
        .any(|cookie| cookie.name() == "session"));
}

#[actix_web::test]
async fn login_maps_bad_credentials_to_401() {
    let mut auth = MockAuthService::new();
    auth.expect_login()
        .times(1)
        .return_once(|_, _| Err(Error::unauthorized("Invalid credentials")));

    let app = actix_test::init_service(test_app(state_with_auth(auth), None)).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({
                "email": "ada@example.com",
                "password": "wrong"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn profile_requires_session() {
    let app = actix_test::init_service(test_app(
        state_with_auth(MockAuthService::new()),
        None,
    ))
    .await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/auth/profile")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn profile_returns_caller_account() {
    let user = fixture_user(UserRole::Student);
    let returned = user.clone();
    let mut auth = MockAuthService::new();
    auth.expect_profile()
        .times(1)
        .return_once(move |_| Ok(returned));

    let app =
        actix_test::init_service(test_app(state_with_auth(auth), Some(user))).await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/auth/profile")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["user"]["firstName"], "Ada");
}

#[actix_web::test]
async fn logout_acknowledges() {
    let user = fixture_user(UserRole::Student);
    let app = actix_test::init_service(test_app(
        state_with_auth(MockAuthService::new()),
        Some(user),
    ))
    .await;
    let cookie = login_cookie(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Logout successful");
}
