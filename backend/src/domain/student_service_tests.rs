//! Tests for the student administration service.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockStudentRepository, PageOf};
use crate::domain::{ErrorCode, UserRole};

fn sample_draft() -> UserDraft {
    UserDraft {
        first_name: "Grace".to_owned(),
        last_name: "Hopper".to_owned(),
        email: "grace@example.com".to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(1992, 3, 14).expect("valid date"),
        role: UserRole::Student,
    }
}

fn sample_user() -> User {
    User::new(sample_draft()).expect("valid draft")
}

#[tokio::test]
async fn create_persists_student() {
    let mut repo = MockStudentRepository::new();
    repo.expect_insert()
        .times(1)
        .withf(|user, _| user.email == "grace@example.com")
        .return_once(|_, _| Ok(()));

    let service = StudentServiceImpl::new(Arc::new(repo));
    let user = service
        .create(sample_draft(), "secret1")
        .await
        .expect("create succeeds");

    assert_eq!(user.full_name(), "Grace Hopper");
}

#[tokio::test]
async fn create_maps_duplicate_email_to_invalid_request() {
    let mut repo = MockStudentRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_, _| Err(StudentPersistenceError::duplicate_email("grace@example.com")));

    let service = StudentServiceImpl::new(Arc::new(repo));
    let error = service
        .create(sample_draft(), "secret1")
        .await
        .expect_err("duplicate email");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn list_builds_pagination_from_total() {
    let mut repo = MockStudentRepository::new();
    repo.expect_list_students().times(1).return_once(|_, _| {
        Ok(PageOf {
            items: vec![sample_user()],
            total: 25,
        })
    });

    let service = StudentServiceImpl::new(Arc::new(repo));
    let page = PageRequest::from_query(Some(2), Some(10));
    let (students, info) = service.list(page, None).await.expect("list succeeds");

    assert_eq!(students.len(), 1);
    assert_eq!(info.current_page, 2);
    assert_eq!(info.total, 25);
    assert_eq!(info.total_pages, 3);
    assert!(info.has_next);
    assert!(info.has_prev);
}

#[tokio::test]
async fn get_returns_not_found_when_missing() {
    let mut repo = MockStudentRepository::new();
    repo.expect_find_student().times(1).return_once(|_| Ok(None));

    let service = StudentServiceImpl::new(Arc::new(repo));
    let error = service.get(Uuid::new_v4()).await.expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Student not found");
}

#[tokio::test]
async fn update_returns_updated_record() {
    let mut user = sample_user();
    user.first_name = "Graciela".to_owned();

    let mut repo = MockStudentRepository::new();
    repo.expect_update_student()
        .times(1)
        .return_once(move |_, _| Ok(Some(user)));

    let service = StudentServiceImpl::new(Arc::new(repo));
    let update = StudentUpdate::new(
        "Graciela",
        "Hopper",
        "grace@example.com",
        NaiveDate::from_ymd_opt(1992, 3, 14).expect("valid date"),
    )
    .expect("valid update");
    let updated = service
        .update(Uuid::new_v4(), update)
        .await
        .expect("update succeeds");

    assert_eq!(updated.first_name, "Graciela");
}

#[tokio::test]
async fn delete_returns_not_found_when_nothing_changed() {
    let mut repo = MockStudentRepository::new();
    repo.expect_delete_student().times(1).return_once(|_| Ok(false));

    let service = StudentServiceImpl::new(Arc::new(repo));
    let error = service.delete(Uuid::new_v4()).await.expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_profile_returns_not_found_for_missing_student() {
    let mut repo = MockStudentRepository::new();
    repo.expect_update_profile().times(1).return_once(|_, _| Ok(None));

    let service = StudentServiceImpl::new(Arc::new(repo));
    let update = ProfileUpdate::new(
        "Grace",
        "Hopper",
        NaiveDate::from_ymd_opt(1992, 3, 14).expect("valid date"),
    )
    .expect("valid update");
    let error = service
        .update_profile(Uuid::new_v4(), update)
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn list_maps_connection_error_to_service_unavailable() {
    let mut repo = MockStudentRepository::new();
    repo.expect_list_students()
        .times(1)
        .return_once(|_, _| Err(StudentPersistenceError::connection("pool unavailable")));

    let service = StudentServiceImpl::new(Arc::new(repo));
    let error = service
        .list(PageRequest::from_query(None, None), None)
        .await
        .expect_err("service unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
