//! Enrollment entity and the read models built around it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Lesson, User};

/// Lifecycle state of an enrollment.
///
/// `Dropped` is terminal; re-enrolling creates a fresh `Active` row so the
/// enrollment history survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Dropped,
}

impl EnrollmentStatus {
    /// Stable string form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Dropped => "dropped",
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = UnknownEnrollmentStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(EnrollmentStatus::Active),
            "dropped" => Ok(EnrollmentStatus::Dropped),
            other => Err(UnknownEnrollmentStatus(other.to_owned())),
        }
    }
}

/// Raised when a stored status string is neither `active` nor `dropped`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown enrollment status: {0}")]
pub struct UnknownEnrollmentStatus(pub String);

/// A student's registration in a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub lesson_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    /// Mint a fresh active enrollment for the given student and lesson.
    pub fn new(student_id: Uuid, lesson_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            student_id,
            lesson_id,
            enrolled_at: now,
            status: EnrollmentStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }
}

/// Condensed student fields joined into enrollment reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for StudentSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Condensed lesson fields joined into enrollment reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub credits: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
}

impl From<&Lesson> for LessonSummary {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            name: lesson.name.clone(),
            code: lesson.code.clone(),
            credits: lesson.credits,
            instructor: lesson.instructor.clone(),
        }
    }
}

/// Lesson header for a roster view, including seat usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonRoster {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub max_capacity: i32,
    pub enrolled_count: i32,
}

impl From<&Lesson> for LessonRoster {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            name: lesson.name.clone(),
            code: lesson.code.clone(),
            max_capacity: lesson.max_capacity,
            enrolled_count: lesson.enrolled_students_count,
        }
    }
}

/// An enrollment with both sides of the join resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentDetail {
    pub enrollment: Enrollment,
    pub student: StudentSummary,
    pub lesson: LessonSummary,
}

/// An enrollment paired with its lesson, for per-student views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentWithLesson {
    pub enrollment: Enrollment,
    pub lesson: LessonSummary,
}

/// An enrollment paired with its student, for per-lesson rosters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentWithStudent {
    pub enrollment: Enrollment,
    pub student: StudentSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_enrollment_starts_active() {
        let enrollment = Enrollment::new(Uuid::new_v4(), Uuid::new_v4());
        assert!(enrollment.is_active());
        assert_eq!(enrollment.enrolled_at, enrollment.created_at);
    }

    #[rstest]
    #[case("active", EnrollmentStatus::Active)]
    #[case("dropped", EnrollmentStatus::Dropped)]
    fn status_parses(#[case] raw: &str, #[case] expected: EnrollmentStatus) {
        assert_eq!(raw.parse::<EnrollmentStatus>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn status_rejects_unknown() {
        assert_eq!(
            "waitlisted".parse::<EnrollmentStatus>(),
            Err(UnknownEnrollmentStatus("waitlisted".to_owned()))
        );
    }
}
