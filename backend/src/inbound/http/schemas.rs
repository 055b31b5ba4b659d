//! Response body types shared across HTTP handlers.

use chrono::{DateTime, NaiveDate, Utc};
use pagination::PageInfo;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Enrollment, EnrollmentDetail, EnrollmentStatus, EnrollmentWithLesson, EnrollmentWithStudent,
    Lesson, LessonStats, LessonSummary, StudentSummary, User, UserRole,
};

/// User record as exposed over HTTP. Credential material never appears here.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            date_of_birth: user.date_of_birth,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Lesson record as exposed over HTTP, with remaining seats precomputed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonBody {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub code: String,
    pub credits: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    pub max_capacity: i32,
    pub enrolled_students_count: i32,
    pub available_spots: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Lesson> for LessonBody {
    fn from(lesson: Lesson) -> Self {
        let available_spots = lesson.available_spots();
        Self {
            id: lesson.id,
            name: lesson.name,
            description: lesson.description,
            code: lesson.code,
            credits: lesson.credits,
            instructor: lesson.instructor,
            max_capacity: lesson.max_capacity,
            enrolled_students_count: lesson.enrolled_students_count,
            available_spots,
            is_active: lesson.is_active,
            created_at: lesson.created_at,
            updated_at: lesson.updated_at,
        }
    }
}

/// Aggregate lesson statistics body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonStatsBody {
    pub total_lessons: i64,
    pub total_capacity: i64,
    pub total_enrollments: i64,
    pub available_spots: i64,
}

impl From<LessonStats> for LessonStatsBody {
    fn from(stats: LessonStats) -> Self {
        Self {
            total_lessons: stats.total_lessons,
            total_capacity: stats.total_capacity,
            total_enrollments: stats.total_enrollments,
            available_spots: stats.available_spots(),
        }
    }
}

/// Bare enrollment record body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentBody {
    pub id: Uuid,
    pub student_id: Uuid,
    pub lesson_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    pub status: EnrollmentStatus,
}

impl From<Enrollment> for EnrollmentBody {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            lesson_id: enrollment.lesson_id,
            enrolled_at: enrollment.enrolled_at,
            status: enrollment.status,
        }
    }
}

/// Enrollment with both sides of the join resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDetailBody {
    pub id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    pub status: EnrollmentStatus,
    pub student: StudentSummary,
    pub lesson: LessonSummary,
}

impl From<EnrollmentDetail> for EnrollmentDetailBody {
    fn from(detail: EnrollmentDetail) -> Self {
        Self {
            id: detail.enrollment.id,
            enrolled_at: detail.enrollment.enrolled_at,
            status: detail.enrollment.status,
            student: detail.student,
            lesson: detail.lesson,
        }
    }
}

/// Enrollment paired with its lesson, for per-student views.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWithLessonBody {
    pub id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    pub status: EnrollmentStatus,
    pub lesson: LessonSummary,
}

impl From<EnrollmentWithLesson> for EnrollmentWithLessonBody {
    fn from(value: EnrollmentWithLesson) -> Self {
        Self {
            id: value.enrollment.id,
            enrolled_at: value.enrollment.enrolled_at,
            status: value.enrollment.status,
            lesson: value.lesson,
        }
    }
}

/// Enrollment paired with its student, for per-lesson rosters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWithStudentBody {
    pub id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    pub status: EnrollmentStatus,
    pub student: StudentSummary,
}

impl From<EnrollmentWithStudent> for EnrollmentWithStudentBody {
    fn from(value: EnrollmentWithStudent) -> Self {
        Self {
            id: value.enrollment.id,
            enrolled_at: value.enrollment.enrolled_at,
            status: value.enrollment.status,
            student: value.student,
        }
    }
}

/// Pagination envelope attached to list responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationBody {
    pub current_page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl From<PageInfo> for PaginationBody {
    fn from(info: PageInfo) -> Self {
        Self {
            current_page: info.current_page,
            total_pages: info.total_pages,
            total: info.total,
            has_next: info.has_next,
            has_prev: info.has_prev,
        }
    }
}
