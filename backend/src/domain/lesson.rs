//! Lesson entity, capacity helpers, and aggregate statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;
const CODE_MIN: usize = 3;
const CODE_MAX: usize = 10;
const CREDITS_MIN: i32 = 1;
const CREDITS_MAX: i32 = 8;
const CAPACITY_MIN: i32 = 1;
const CAPACITY_MAX: i32 = 500;

/// Seats offered when a draft supplies no explicit capacity.
pub const DEFAULT_MAX_CAPACITY: i32 = 50;

/// Validation failures raised by lesson constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LessonValidationError {
    /// Name outside the 3..=100 character range after trimming.
    #[error("lesson name must be between 3 and 100 characters")]
    NameLength,
    /// Description longer than 500 characters.
    #[error("description cannot exceed 500 characters")]
    DescriptionTooLong,
    /// Code outside the 3..=10 character range after trimming.
    #[error("lesson code must be between 3 and 10 characters")]
    CodeLength,
    /// Credits outside 1..=8.
    #[error("credits must be between 1 and 8")]
    CreditsOutOfRange,
    /// Instructor name longer than 100 characters.
    #[error("instructor name cannot exceed 100 characters")]
    InstructorTooLong,
    /// Capacity outside 1..=500.
    #[error("maximum capacity must be between 1 and 500")]
    CapacityOutOfRange,
}

/// Unvalidated lesson attributes supplied by callers.
#[derive(Debug, Clone)]
pub struct LessonDraft {
    pub name: String,
    pub description: Option<String>,
    pub code: String,
    pub credits: i32,
    pub instructor: Option<String>,
    /// Defaults to [`DEFAULT_MAX_CAPACITY`] when absent.
    pub max_capacity: Option<i32>,
}

/// A course offering.
///
/// Invariant: `0 <= enrolled_students_count <= max_capacity` must hold after
/// every enrollment mutation; the storage layer enforces it with conditional
/// seat updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Unique, uppercase short code such as `MATH101`.
    pub code: String,
    pub credits: i32,
    pub instructor: Option<String>,
    pub max_capacity: i32,
    /// Denormalized count of active enrollments referencing this lesson.
    pub enrolled_students_count: i32,
    /// Soft-delete flag; inactive lessons are hidden from every listing.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validated_name(raw: &str) -> Result<String, LessonValidationError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(LessonValidationError::NameLength);
    }
    Ok(trimmed.to_owned())
}

fn validated_description(
    raw: Option<&str>,
) -> Result<Option<String>, LessonValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            if trimmed.chars().count() > DESCRIPTION_MAX {
                return Err(LessonValidationError::DescriptionTooLong);
            }
            Ok(Some(trimmed.to_owned()))
        }
    }
}

fn validated_code(raw: &str) -> Result<String, LessonValidationError> {
    let code = raw.trim().to_uppercase();
    let len = code.chars().count();
    if !(CODE_MIN..=CODE_MAX).contains(&len) {
        return Err(LessonValidationError::CodeLength);
    }
    Ok(code)
}

fn validated_credits(credits: i32) -> Result<i32, LessonValidationError> {
    if !(CREDITS_MIN..=CREDITS_MAX).contains(&credits) {
        return Err(LessonValidationError::CreditsOutOfRange);
    }
    Ok(credits)
}

fn validated_instructor(
    raw: Option<&str>,
) -> Result<Option<String>, LessonValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            if trimmed.chars().count() > NAME_MAX {
                return Err(LessonValidationError::InstructorTooLong);
            }
            Ok(Some(trimmed.to_owned()))
        }
    }
}

fn validated_capacity(capacity: i32) -> Result<i32, LessonValidationError> {
    if !(CAPACITY_MIN..=CAPACITY_MAX).contains(&capacity) {
        return Err(LessonValidationError::CapacityOutOfRange);
    }
    Ok(capacity)
}

impl Lesson {
    /// Validate a draft and mint a fresh, empty, active lesson.
    pub fn new(draft: LessonDraft) -> Result<Self, LessonValidationError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: validated_name(&draft.name)?,
            description: validated_description(draft.description.as_deref())?,
            code: validated_code(&draft.code)?,
            credits: validated_credits(draft.credits)?,
            instructor: validated_instructor(draft.instructor.as_deref())?,
            max_capacity: validated_capacity(
                draft.max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY),
            )?,
            enrolled_students_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether at least one seat remains. Recomputed from current state on
    /// every check.
    pub fn has_capacity(&self) -> bool {
        self.enrolled_students_count < self.max_capacity
    }

    /// Remaining seats, floored at zero.
    pub fn available_spots(&self) -> i32 {
        (self.max_capacity - self.enrolled_students_count).max(0)
    }
}

/// Validated replacement attributes for a lesson update.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonUpdate {
    pub name: String,
    pub description: Option<String>,
    pub code: String,
    pub credits: i32,
    pub instructor: Option<String>,
    pub max_capacity: i32,
}

impl LessonUpdate {
    /// Validate replacement fields; the same rules as creation apply.
    pub fn new(draft: LessonDraft) -> Result<Self, LessonValidationError> {
        Ok(Self {
            name: validated_name(&draft.name)?,
            description: validated_description(draft.description.as_deref())?,
            code: validated_code(&draft.code)?,
            credits: validated_credits(draft.credits)?,
            instructor: validated_instructor(draft.instructor.as_deref())?,
            max_capacity: validated_capacity(
                draft.max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY),
            )?,
        })
    }
}

/// Aggregate numbers across all active lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonStats {
    pub total_lessons: i64,
    pub total_capacity: i64,
    pub total_enrollments: i64,
}

impl LessonStats {
    /// Seats still open across all active lessons.
    pub fn available_spots(&self) -> i64 {
        (self.total_capacity - self.total_enrollments).max(0)
    }
}
