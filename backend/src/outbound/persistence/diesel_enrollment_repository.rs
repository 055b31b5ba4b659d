//! PostgreSQL-backed `EnrollmentRepository` implementation using Diesel ORM.
//!
//! The partial unique index on active `(student_id, lesson_id)` pairs backs
//! `insert_active`; violating it surfaces as `DuplicateActive` so the service
//! layer can answer with a conflict instead of a server error.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{EnrollmentPersistenceError, EnrollmentRepository, PageOf};
use crate::domain::{
    Enrollment, EnrollmentDetail, EnrollmentStatus, EnrollmentWithLesson, EnrollmentWithStudent,
    LessonSummary, StudentSummary,
};

use super::diesel_error_mapping::{
    map_diesel_error, map_pool_error, unique_violation_constraint,
};
use super::models::{EnrollmentRow, LessonRow, NewEnrollmentRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{enrollments, lessons, users};

/// Diesel-backed implementation of the enrollment repository port.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> EnrollmentPersistenceError {
    map_pool_error(error, EnrollmentPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> EnrollmentPersistenceError {
    map_diesel_error(
        error,
        EnrollmentPersistenceError::query,
        EnrollmentPersistenceError::connection,
    )
}

fn insert_error(error: diesel::result::Error) -> EnrollmentPersistenceError {
    if unique_violation_constraint(&error).is_some() {
        return EnrollmentPersistenceError::duplicate_active(
            "an active enrollment already exists for this student and lesson",
        );
    }
    diesel_error(error)
}

fn row_to_enrollment(row: EnrollmentRow) -> Result<Enrollment, EnrollmentPersistenceError> {
    let status: EnrollmentStatus = row
        .status
        .parse()
        .map_err(|err: crate::domain::UnknownEnrollmentStatus| {
            EnrollmentPersistenceError::query(err.to_string())
        })?;

    Ok(Enrollment {
        id: row.id,
        student_id: row.student_id,
        lesson_id: row.lesson_id,
        enrolled_at: row.enrolled_at,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn student_summary(row: &UserRow) -> StudentSummary {
    StudentSummary {
        id: row.id,
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        email: row.email.clone(),
    }
}

fn lesson_summary(row: &LessonRow) -> LessonSummary {
    LessonSummary {
        id: row.id,
        name: row.name.clone(),
        code: row.code.clone(),
        credits: row.credits,
        instructor: row.instructor.clone(),
    }
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn insert_active(
        &self,
        enrollment: &Enrollment,
    ) -> Result<(), EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let new_row = NewEnrollmentRow {
            id: enrollment.id,
            student_id: enrollment.student_id,
            lesson_id: enrollment.lesson_id,
            enrolled_at: enrollment.enrolled_at,
            status: enrollment.status.as_str(),
        };

        diesel::insert_into(enrollments::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(insert_error)
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Enrollment>, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = enrollments::table
            .filter(enrollments::id.eq(id))
            .select(EnrollmentRow::as_select())
            .first::<EnrollmentRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_enrollment).transpose()
    }

    async fn find_active(
        &self,
        student_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<Option<Enrollment>, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = enrollments::table
            .filter(
                enrollments::student_id
                    .eq(student_id)
                    .and(enrollments::lesson_id.eq(lesson_id))
                    .and(enrollments::status.eq(EnrollmentStatus::Active.as_str())),
            )
            .select(EnrollmentRow::as_select())
            .first::<EnrollmentRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_enrollment).transpose()
    }

    async fn mark_dropped(&self, id: Uuid) -> Result<bool, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let changed = diesel::update(
            enrollments::table.filter(
                enrollments::id
                    .eq(id)
                    .and(enrollments::status.eq(EnrollmentStatus::Active.as_str())),
            ),
        )
        .set((
            enrollments::status.eq(EnrollmentStatus::Dropped.as_str()),
            enrollments::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;

        Ok(changed > 0)
    }

    async fn list_active(
        &self,
        page: PageRequest,
    ) -> Result<PageOf<EnrollmentDetail>, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let total: i64 = enrollments::table
            .filter(enrollments::status.eq(EnrollmentStatus::Active.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        let rows: Vec<(EnrollmentRow, UserRow, LessonRow)> = enrollments::table
            .inner_join(users::table)
            .inner_join(lessons::table)
            .filter(enrollments::status.eq(EnrollmentStatus::Active.as_str()))
            .order(enrollments::enrolled_at.desc())
            .limit(page.limit_i64())
            .offset(page.offset())
            .select((
                EnrollmentRow::as_select(),
                UserRow::as_select(),
                LessonRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        let items = rows
            .into_iter()
            .map(|(enrollment_row, user_row, lesson_row)| {
                Ok(EnrollmentDetail {
                    student: student_summary(&user_row),
                    lesson: lesson_summary(&lesson_row),
                    enrollment: row_to_enrollment(enrollment_row)?,
                })
            })
            .collect::<Result<Vec<_>, EnrollmentPersistenceError>>()?;

        Ok(PageOf {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<EnrollmentWithLesson>, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<(EnrollmentRow, LessonRow)> = enrollments::table
            .inner_join(lessons::table)
            .filter(
                enrollments::student_id
                    .eq(student_id)
                    .and(enrollments::status.eq(EnrollmentStatus::Active.as_str())),
            )
            .order(enrollments::enrolled_at.desc())
            .select((EnrollmentRow::as_select(), LessonRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows.into_iter()
            .map(|(enrollment_row, lesson_row)| {
                Ok(EnrollmentWithLesson {
                    lesson: lesson_summary(&lesson_row),
                    enrollment: row_to_enrollment(enrollment_row)?,
                })
            })
            .collect()
    }

    async fn list_for_lesson(
        &self,
        lesson_id: Uuid,
    ) -> Result<Vec<EnrollmentWithStudent>, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<(EnrollmentRow, UserRow)> = enrollments::table
            .inner_join(users::table)
            .filter(
                enrollments::lesson_id
                    .eq(lesson_id)
                    .and(enrollments::status.eq(EnrollmentStatus::Active.as_str())),
            )
            .order(enrollments::enrolled_at.asc())
            .select((EnrollmentRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows.into_iter()
            .map(|(enrollment_row, user_row)| {
                Ok(EnrollmentWithStudent {
                    student: student_summary(&user_row),
                    enrollment: row_to_enrollment(enrollment_row)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> EnrollmentRow {
        let now = Utc::now();
        EnrollmentRow {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            lesson_id: Uuid::new_v4(),
            enrolled_at: now,
            status: "active".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn row_conversion_parses_status(valid_row: EnrollmentRow) {
        let enrollment = row_to_enrollment(valid_row).expect("valid row");
        assert!(enrollment.is_active());
    }

    #[rstest]
    fn row_conversion_rejects_unknown_status(mut valid_row: EnrollmentRow) {
        valid_row.status = "waitlisted".to_owned();

        let error = row_to_enrollment(valid_row).expect_err("unknown status should fail");
        assert!(matches!(error, EnrollmentPersistenceError::Query { .. }));
        assert!(error.to_string().contains("waitlisted"));
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_active() {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        struct Info;
        impl diesel::result::DatabaseErrorInformation for Info {
            fn message(&self) -> &str {
                "duplicate key value violates unique constraint"
            }
            fn details(&self) -> Option<&str> {
                None
            }
            fn hint(&self) -> Option<&str> {
                None
            }
            fn table_name(&self) -> Option<&str> {
                Some("enrollments")
            }
            fn column_name(&self) -> Option<&str> {
                None
            }
            fn constraint_name(&self) -> Option<&str> {
                Some("enrollments_active_student_lesson_idx")
            }
            fn statement_position(&self) -> Option<i32> {
                None
            }
        }

        let err = DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(Info));
        assert!(matches!(
            insert_error(err),
            EnrollmentPersistenceError::DuplicateActive { .. }
        ));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, EnrollmentPersistenceError::Connection { .. }));
    }
}
