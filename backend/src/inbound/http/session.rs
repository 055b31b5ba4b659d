//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers deal only in domain terms: who
//! is logged in and with which role.

use std::str::FromStr;

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::{Error, User, UserRole};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USER_ROLE_KEY: &str = "user_role";

/// Authenticated caller identity read from the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub role: UserRole,
}

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id and role in the session cookie.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user.id.to_string())
            .and_then(|()| self.0.insert(USER_ROLE_KEY, user.role.as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop all session state, ending the login.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Fetch the current user from the session, if present and well formed.
    pub fn current_user(&self) -> Result<Option<SessionUser>, Error> {
        let read = |key| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_role)) = (read(USER_ID_KEY)?, read(USER_ROLE_KEY)?) else {
            return Ok(None);
        };
        match (Uuid::parse_str(&raw_id), UserRole::from_str(&raw_role)) {
            (Ok(id), Ok(role)) => Ok(Some(SessionUser { id, role })),
            _ => {
                tracing::warn!("malformed identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated user or return `401 Unauthorized`.
    pub fn require_user(&self) -> Result<SessionUser, Error> {
        self.current_user()?
            .ok_or_else(|| Error::unauthorized("Authentication required"))
    }

    /// Require an authenticated admin or return `403 Forbidden`.
    pub fn require_admin(&self) -> Result<SessionUser, Error> {
        let user = self.require_user()?;
        if user.role != UserRole::Admin {
            return Err(Error::forbidden("Access forbidden. Insufficient permissions."));
        }
        Ok(user)
    }

    /// Require an authenticated student or return `403 Forbidden`.
    pub fn require_student(&self) -> Result<SessionUser, Error> {
        let user = self.require_user()?;
        if user.role != UserRole::Student {
            return Err(Error::forbidden("Access forbidden. Insufficient permissions."));
        }
        Ok(user)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};
    use chrono::NaiveDate;

    use crate::domain::UserDraft;
    use crate::inbound::http::error::ApiError;

    fn fixture_user(role: UserRole) -> User {
        User::new(UserDraft {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).expect("valid date"),
            role,
        })
        .expect("valid draft")
    }

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    #[actix_web::test]
    async fn round_trips_user_identity() {
        let user = fixture_user(UserRole::Student);
        let expected_id = user.id;
        let app = test::init_service(
            session_test_app()
                .route(
                    "/login",
                    web::get().to(move |session: SessionContext| {
                        let user = user.clone();
                        async move {
                            session.persist_user(&user).map_err(ApiError::from)?;
                            Ok::<_, ApiError>(HttpResponse::Ok())
                        }
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        let user = session.require_user().map_err(ApiError::from)?;
                        Ok::<_, ApiError>(HttpResponse::Ok().body(user.id.to_string()))
                    }),
                ),
        )
        .await;

        let login =
            test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        assert_eq!(login.status(), StatusCode::OK);
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let whoami = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(whoami.status(), StatusCode::OK);
        let body = test::read_body(whoami).await;
        assert_eq!(body, expected_id.to_string().as_bytes());
    }

    #[actix_web::test]
    async fn missing_user_is_unauthorized() {
        let app = test::init_service(session_test_app().route(
            "/whoami",
            web::get().to(|session: SessionContext| async move {
                let _ = session.require_user().map_err(ApiError::from)?;
                Ok::<_, ApiError>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn student_role_cannot_pass_admin_gate() {
        let user = fixture_user(UserRole::Student);
        let app = test::init_service(
            session_test_app()
                .route(
                    "/login",
                    web::get().to(move |session: SessionContext| {
                        let user = user.clone();
                        async move {
                            session.persist_user(&user).map_err(ApiError::from)?;
                            Ok::<_, ApiError>(HttpResponse::Ok())
                        }
                    }),
                )
                .route(
                    "/admin-only",
                    web::get().to(|session: SessionContext| async move {
                        let _ = session.require_admin().map_err(ApiError::from)?;
                        Ok::<_, ApiError>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let login =
            test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin-only")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn tampered_identity_is_unauthorized() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/tamper",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid id");
                        session
                            .insert(USER_ROLE_KEY, "student")
                            .expect("set role");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        let _ = session.require_user().map_err(ApiError::from)?;
                        Ok::<_, ApiError>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let tamper =
            test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;
        let cookie = tamper
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
