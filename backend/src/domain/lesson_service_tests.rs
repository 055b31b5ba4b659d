//! Tests for the lesson administration service.

use std::sync::Arc;

use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockLessonRepository, PageOf};
use crate::domain::ErrorCode;

fn sample_draft() -> LessonDraft {
    LessonDraft {
        name: "Linear Algebra".to_owned(),
        description: None,
        code: "MATH101".to_owned(),
        credits: 4,
        instructor: Some("Dr. Noether".to_owned()),
        max_capacity: Some(30),
    }
}

fn sample_lesson() -> Lesson {
    Lesson::new(sample_draft()).expect("valid draft")
}

#[tokio::test]
async fn create_persists_lesson() {
    let mut repo = MockLessonRepository::new();
    repo.expect_insert()
        .times(1)
        .withf(|lesson| lesson.code == "MATH101")
        .return_once(|_| Ok(()));

    let service = LessonServiceImpl::new(Arc::new(repo));
    let lesson = service.create(sample_draft()).await.expect("create succeeds");

    assert_eq!(lesson.enrolled_students_count, 0);
}

#[tokio::test]
async fn create_maps_validation_error_to_invalid_request() {
    let mut repo = MockLessonRepository::new();
    repo.expect_insert().times(0);

    let mut draft = sample_draft();
    draft.credits = 0;

    let service = LessonServiceImpl::new(Arc::new(repo));
    let error = service.create(draft).await.expect_err("invalid request");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn create_maps_duplicate_code_to_invalid_request() {
    let mut repo = MockLessonRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(LessonPersistenceError::duplicate_code("MATH101")));

    let service = LessonServiceImpl::new(Arc::new(repo));
    let error = service
        .create(sample_draft())
        .await
        .expect_err("duplicate code");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Lesson code already exists");
}

#[tokio::test]
async fn list_builds_pagination_from_total() {
    let mut repo = MockLessonRepository::new();
    repo.expect_list().times(1).return_once(|_, _| {
        Ok(PageOf {
            items: vec![sample_lesson()],
            total: 1,
        })
    });

    let service = LessonServiceImpl::new(Arc::new(repo));
    let page = PageRequest::from_query(None, None);
    let (lessons, info) = service.list(page, None).await.expect("list succeeds");

    assert_eq!(lessons.len(), 1);
    assert_eq!(info.total_pages, 1);
    assert!(!info.has_next);
}

#[tokio::test]
async fn get_returns_not_found_when_missing() {
    let mut repo = MockLessonRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let service = LessonServiceImpl::new(Arc::new(repo));
    let error = service.get(Uuid::new_v4()).await.expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Lesson not found");
}

#[tokio::test]
async fn deactivate_returns_not_found_when_nothing_changed() {
    let mut repo = MockLessonRepository::new();
    repo.expect_deactivate().times(1).return_once(|_| Ok(false));

    let service = LessonServiceImpl::new(Arc::new(repo));
    let error = service
        .deactivate(Uuid::new_v4())
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn stats_pass_through() {
    let mut repo = MockLessonRepository::new();
    repo.expect_stats().times(1).return_once(|| {
        Ok(LessonStats {
            total_lessons: 3,
            total_capacity: 90,
            total_enrollments: 45,
        })
    });

    let service = LessonServiceImpl::new(Arc::new(repo));
    let stats = service.stats().await.expect("stats succeed");

    assert_eq!(stats.available_spots(), 45);
}

#[tokio::test]
async fn available_builds_pagination_from_total() {
    let mut repo = MockLessonRepository::new();
    repo.expect_list_available_for_student()
        .times(1)
        .return_once(|_, _, _| {
            Ok(PageOf {
                items: vec![sample_lesson()],
                total: 1,
            })
        });

    let service = LessonServiceImpl::new(Arc::new(repo));
    let page = PageRequest::from_query(None, None);
    let (lessons, info) = service
        .available_for_student(Uuid::new_v4(), page, None)
        .await
        .expect("list succeeds");

    assert_eq!(lessons.len(), 1);
    assert_eq!(info.total, 1);
}

#[tokio::test]
async fn available_maps_connection_error_to_service_unavailable() {
    let mut repo = MockLessonRepository::new();
    repo.expect_list_available_for_student()
        .times(1)
        .return_once(|_, _, _| Err(LessonPersistenceError::connection("pool unavailable")));

    let service = LessonServiceImpl::new(Arc::new(repo));
    let error = service
        .available_for_student(Uuid::new_v4(), PageRequest::from_query(None, None), None)
        .await
        .expect_err("service unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
