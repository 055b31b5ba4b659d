//! Tests for the authentication service.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockStudentRepository, UserCredentials};
use crate::domain::{ErrorCode, UserRole};

fn sample_draft() -> UserDraft {
    UserDraft {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).expect("valid date"),
        role: UserRole::Student,
    }
}

fn sample_user() -> User {
    User::new(sample_draft()).expect("valid draft")
}

#[tokio::test]
async fn register_hashes_and_persists() {
    let mut repo = MockStudentRepository::new();
    repo.expect_insert()
        .times(1)
        .withf(|user, hash| user.email == "ada@example.com" && hash.starts_with("$pbkdf2"))
        .return_once(|_, _| Ok(()));

    let service = AuthServiceImpl::new(Arc::new(repo));
    let user = service
        .register(sample_draft(), "secret1")
        .await
        .expect("registration succeeds");

    assert_eq!(user.role, UserRole::Student);
    assert!(user.is_active);
}

#[tokio::test]
async fn register_rejects_short_password_before_persisting() {
    let mut repo = MockStudentRepository::new();
    repo.expect_insert().times(0);

    let service = AuthServiceImpl::new(Arc::new(repo));
    let error = service
        .register(sample_draft(), "short")
        .await
        .expect_err("invalid request");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn register_maps_duplicate_email_to_invalid_request() {
    let mut repo = MockStudentRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_, _| Err(StudentPersistenceError::duplicate_email("ada@example.com")));

    let service = AuthServiceImpl::new(Arc::new(repo));
    let error = service
        .register(sample_draft(), "secret1")
        .await
        .expect_err("duplicate email");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Email already registered");
}

#[tokio::test]
async fn login_accepts_matching_credentials() {
    let user = sample_user();
    let expected_id = user.id;
    let hash = password::hash_password("secret1").expect("hashing succeeds");

    let mut repo = MockStudentRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .withf(|email| email == "ada@example.com")
        .return_once(move |_| {
            Ok(Some(UserCredentials {
                user,
                password_hash: hash,
            }))
        });

    let service = AuthServiceImpl::new(Arc::new(repo));
    let logged_in = service
        .login("  Ada@Example.COM ", "secret1")
        .await
        .expect("login succeeds");

    assert_eq!(logged_in.id, expected_id);
}

#[tokio::test]
async fn login_rejects_unknown_email() {
    let mut repo = MockStudentRepository::new();
    repo.expect_find_by_email().times(1).return_once(|_| Ok(None));

    let service = AuthServiceImpl::new(Arc::new(repo));
    let error = service
        .login("nobody@example.com", "secret1")
        .await
        .expect_err("unauthorized");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "Invalid credentials");
}

#[tokio::test]
async fn login_rejects_wrong_password_with_same_message() {
    let user = sample_user();
    let hash = password::hash_password("secret1").expect("hashing succeeds");

    let mut repo = MockStudentRepository::new();
    repo.expect_find_by_email().times(1).return_once(move |_| {
        Ok(Some(UserCredentials {
            user,
            password_hash: hash,
        }))
    });

    let service = AuthServiceImpl::new(Arc::new(repo));
    let error = service
        .login("ada@example.com", "wrong-password")
        .await
        .expect_err("unauthorized");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "Invalid credentials");
}

#[tokio::test]
async fn profile_returns_not_found_when_missing() {
    let mut repo = MockStudentRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let service = AuthServiceImpl::new(Arc::new(repo));
    let error = service.profile(Uuid::new_v4()).await.expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn profile_maps_connection_error_to_service_unavailable() {
    let mut repo = MockStudentRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| Err(StudentPersistenceError::connection("pool unavailable")));

    let service = AuthServiceImpl::new(Arc::new(repo));
    let error = service
        .profile(Uuid::new_v4())
        .await
        .expect_err("service unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
