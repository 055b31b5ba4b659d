//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
use state_builders::build_http_state;

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};

#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::auth::{login, logout, profile, register};
use backend::inbound::http::enrollments::{
    delete_enrollment, enroll_student, lesson_enrollments, list_enrollments, student_enrollments,
};
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::lessons::{
    create_lesson, delete_lesson, get_lesson, lesson_stats, list_lessons, update_lesson,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::student_self::{
    available_lessons, drop_lesson, enroll, get_profile, my_lessons, update_profile,
};
use backend::inbound::http::students::{
    create_student, delete_student, get_student, list_students, update_student,
};
use backend::Trace;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    // lesson_stats must register ahead of get_lesson so /stats is not
    // swallowed by the {id} matcher.
    let api = web::scope("/api")
        .wrap(session)
        .service(register)
        .service(login)
        .service(logout)
        .service(profile)
        .service(create_student)
        .service(list_students)
        .service(get_student)
        .service(update_student)
        .service(delete_student)
        .service(create_lesson)
        .service(list_lessons)
        .service(lesson_stats)
        .service(get_lesson)
        .service(update_lesson)
        .service(delete_lesson)
        .service(enroll_student)
        .service(list_enrollments)
        .service(student_enrollments)
        .service(lesson_enrollments)
        .service(delete_enrollment)
        .service(get_profile)
        .service(update_profile)
        .service(available_lessons)
        .service(my_lessons)
        .service(enroll)
        .service(drop_lesson);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config.db_pool);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
