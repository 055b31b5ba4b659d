//! User entity: identity, role, and profile validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 6;

/// Role attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access to student, lesson, and enrollment administration.
    Admin,
    /// Self-service access scoped to the caller's own records.
    Student,
}

impl UserRole {
    /// Stable string form used in session state and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Student => "student",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(UserRole::Admin),
            "student" => Ok(UserRole::Student),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

/// Validation failures raised by user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// First name shorter than two characters after trimming.
    #[error("first name must be at least 2 characters")]
    FirstNameTooShort,
    /// Last name shorter than two characters after trimming.
    #[error("last name must be at least 2 characters")]
    LastNameTooShort,
    /// Email missing or structurally invalid.
    #[error("email address is not valid")]
    InvalidEmail,
    /// Date of birth lies in the future.
    #[error("date of birth cannot be in the future")]
    FutureDateOfBirth,
    /// Password shorter than six characters.
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    /// Role string is neither `admin` nor `student`.
    #[error("role must be admin or student")]
    UnknownRole,
}

/// Unvalidated user attributes supplied by callers.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub role: UserRole,
}

/// A registered user. Passwords never appear on this type; credential
/// material stays inside the persistence and auth layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
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

fn validated_name(raw: &str, error: UserValidationError) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

/// Trim and lowercase an email, rejecting shapes without a local part and
/// domain.
pub fn normalized_email(raw: &str) -> Result<String, UserValidationError> {
    let email = raw.trim().to_lowercase();
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(UserValidationError::InvalidEmail);
    }
    Ok(email)
}

fn validated_date_of_birth(value: NaiveDate) -> Result<NaiveDate, UserValidationError> {
    if value >= Utc::now().date_naive() {
        return Err(UserValidationError::FutureDateOfBirth);
    }
    Ok(value)
}

/// Reject passwords below the minimum length. Hashing happens elsewhere.
pub fn validated_password(raw: &str) -> Result<&str, UserValidationError> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(UserValidationError::PasswordTooShort);
    }
    Ok(raw)
}

impl User {
    /// Validate a draft and mint a fresh user with a new id and timestamps.
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            first_name: validated_name(&draft.first_name, UserValidationError::FirstNameTooShort)?,
            last_name: validated_name(&draft.last_name, UserValidationError::LastNameTooShort)?,
            email: normalized_email(&draft.email)?,
            date_of_birth: validated_date_of_birth(draft.date_of_birth)?,
            role: draft.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Display name in "First Last" form.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Validated replacement attributes for an admin student update.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

impl StudentUpdate {
    /// Validate the replacement fields for a student record.
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            first_name: validated_name(first_name, UserValidationError::FirstNameTooShort)?,
            last_name: validated_name(last_name, UserValidationError::LastNameTooShort)?,
            email: normalized_email(email)?,
            date_of_birth: validated_date_of_birth(date_of_birth)?,
        })
    }
}

/// Validated replacement attributes for a self-service profile update.
///
/// Students may not change their own email through this path.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl ProfileUpdate {
    /// Validate the replacement fields for the caller's own profile.
    pub fn new(
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            first_name: validated_name(first_name, UserValidationError::FirstNameTooShort)?,
            last_name: validated_name(last_name, UserValidationError::LastNameTooShort)?,
            date_of_birth: validated_date_of_birth(date_of_birth)?,
        })
    }
}
