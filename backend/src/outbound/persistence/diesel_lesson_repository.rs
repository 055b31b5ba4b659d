//! PostgreSQL-backed `LessonRepository` implementation using Diesel ORM.
//!
//! Seat accounting happens through single conditional `UPDATE` statements so
//! concurrent enrollments can never push the enrolled count past capacity.

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{
    LessonPersistenceError, LessonRepository, PageOf, SeatAcquisition,
};
use crate::domain::{EnrollmentStatus, Lesson, LessonStats, LessonUpdate};

use super::diesel_error_mapping::{
    map_diesel_error, map_pool_error, unique_violation_constraint,
};
use super::models::{LessonChangeset, LessonRow, NewLessonRow};
use super::pool::{DbPool, PoolError};
use super::schema::{enrollments, lessons};

/// Diesel-backed implementation of the lesson repository port.
#[derive(Clone)]
pub struct DieselLessonRepository {
    pool: DbPool,
}

impl DieselLessonRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> LessonPersistenceError {
    map_pool_error(error, LessonPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> LessonPersistenceError {
    map_diesel_error(
        error,
        LessonPersistenceError::query,
        LessonPersistenceError::connection,
    )
}

/// Distinguish name and code unique violations before falling back to the
/// common mapping.
fn write_error(lesson_name: &str, code: &str, error: diesel::result::Error) -> LessonPersistenceError {
    match unique_violation_constraint(&error) {
        Some(constraint) if constraint.contains("code") => {
            LessonPersistenceError::duplicate_code(code)
        }
        Some(constraint) if constraint.contains("name") => {
            LessonPersistenceError::duplicate_name(lesson_name)
        }
        _ => diesel_error(error),
    }
}

fn row_to_lesson(row: LessonRow) -> Lesson {
    Lesson {
        id: row.id,
        name: row.name,
        description: row.description,
        code: row.code,
        credits: row.credits,
        instructor: row.instructor,
        max_capacity: row.max_capacity,
        enrolled_students_count: row.enrolled_students_count,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl LessonRepository for DieselLessonRepository {
    async fn insert(&self, lesson: &Lesson) -> Result<(), LessonPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let new_row = NewLessonRow {
            id: lesson.id,
            name: &lesson.name,
            description: lesson.description.as_deref(),
            code: &lesson.code,
            credits: lesson.credits,
            instructor: lesson.instructor.as_deref(),
            max_capacity: lesson.max_capacity,
            enrolled_students_count: lesson.enrolled_students_count,
            is_active: lesson.is_active,
        };

        diesel::insert_into(lessons::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| write_error(&lesson.name, &lesson.code, err))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Lesson>, LessonPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = lessons::table
            .filter(lessons::id.eq(id).and(lessons::is_active.eq(true)))
            .select(LessonRow::as_select())
            .first::<LessonRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        Ok(row.map(row_to_lesson))
    }

    async fn list<'a>(
        &self,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<PageOf<Lesson>, LessonPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let mut count_query = lessons::table
            .filter(lessons::is_active.eq(true))
            .select(count_star())
            .into_boxed();
        let mut rows_query = lessons::table
            .filter(lessons::is_active.eq(true))
            .select(LessonRow::as_select())
            .into_boxed();

        if let Some(term) = search {
            let pattern = format!("%{term}%");
            count_query = count_query.filter(
                lessons::name
                    .ilike(pattern.clone())
                    .nullable()
                    .or(lessons::code.ilike(pattern.clone()).nullable())
                    .or(lessons::instructor.ilike(pattern.clone()).nullable()),
            );
            rows_query = rows_query.filter(
                lessons::name
                    .ilike(pattern.clone())
                    .nullable()
                    .or(lessons::code.ilike(pattern.clone()).nullable())
                    .or(lessons::instructor.ilike(pattern).nullable()),
            );
        }

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        let rows: Vec<LessonRow> = rows_query
            .order(lessons::created_at.desc())
            .limit(page.limit_i64())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(PageOf {
            items: rows.into_iter().map(row_to_lesson).collect(),
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn list_available_for_student<'a>(
        &self,
        student_id: Uuid,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<PageOf<Lesson>, LessonPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let enrolled_lessons = enrollments::table
            .filter(
                enrollments::student_id
                    .eq(student_id)
                    .and(enrollments::status.eq(EnrollmentStatus::Active.as_str())),
            )
            .select(enrollments::lesson_id);

        let mut count_query = lessons::table
            .filter(
                lessons::is_active
                    .eq(true)
                    .and(lessons::id.ne_all(enrolled_lessons.clone())),
            )
            .select(count_star())
            .into_boxed();
        let mut rows_query = lessons::table
            .filter(
                lessons::is_active
                    .eq(true)
                    .and(lessons::id.ne_all(enrolled_lessons)),
            )
            .select(LessonRow::as_select())
            .into_boxed();

        if let Some(term) = search {
            let pattern = format!("%{term}%");
            count_query = count_query.filter(
                lessons::name
                    .ilike(pattern.clone())
                    .nullable()
                    .or(lessons::code.ilike(pattern.clone()).nullable())
                    .or(lessons::instructor.ilike(pattern.clone()).nullable()),
            );
            rows_query = rows_query.filter(
                lessons::name
                    .ilike(pattern.clone())
                    .nullable()
                    .or(lessons::code.ilike(pattern.clone()).nullable())
                    .or(lessons::instructor.ilike(pattern).nullable()),
            );
        }

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        let rows: Vec<LessonRow> = rows_query
            .order(lessons::name.asc())
            .limit(page.limit_i64())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(PageOf {
            items: rows.into_iter().map(row_to_lesson).collect(),
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn update(
        &self,
        id: Uuid,
        update: &LessonUpdate,
    ) -> Result<Option<Lesson>, LessonPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let changeset = LessonChangeset {
            name: &update.name,
            description: update.description.as_deref(),
            code: &update.code,
            credits: update.credits,
            instructor: update.instructor.as_deref(),
            max_capacity: update.max_capacity,
            updated_at: Utc::now(),
        };

        let row = diesel::update(
            lessons::table.filter(lessons::id.eq(id).and(lessons::is_active.eq(true))),
        )
        .set(&changeset)
        .returning(LessonRow::as_returning())
        .get_result::<LessonRow>(&mut conn)
        .await
        .optional()
        .map_err(|err| write_error(&update.name, &update.code, err))?;

        Ok(row.map(row_to_lesson))
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, LessonPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let changed = diesel::update(
            lessons::table.filter(lessons::id.eq(id).and(lessons::is_active.eq(true))),
        )
        .set((
            lessons::is_active.eq(false),
            lessons::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;

        Ok(changed > 0)
    }

    async fn acquire_seat(&self, id: Uuid) -> Result<SeatAcquisition, LessonPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        // The capacity guard lives inside the UPDATE's WHERE clause, so two
        // racing enrollments cannot both claim the last seat.
        let claimed = diesel::update(
            lessons::table.filter(
                lessons::id
                    .eq(id)
                    .and(lessons::is_active.eq(true))
                    .and(lessons::enrolled_students_count.lt(lessons::max_capacity)),
            ),
        )
        .set((
            lessons::enrolled_students_count.eq(lessons::enrolled_students_count + 1),
            lessons::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;

        if claimed > 0 {
            return Ok(SeatAcquisition::Acquired);
        }

        let exists: i64 = lessons::table
            .filter(lessons::id.eq(id).and(lessons::is_active.eq(true)))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        if exists > 0 {
            Ok(SeatAcquisition::Full)
        } else {
            Ok(SeatAcquisition::MissingOrInactive)
        }
    }

    async fn release_seat(&self, id: Uuid) -> Result<(), LessonPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        // Floors at zero: rows already at zero do not match the filter.
        diesel::update(
            lessons::table.filter(
                lessons::id
                    .eq(id)
                    .and(lessons::enrolled_students_count.gt(0)),
            ),
        )
        .set((
            lessons::enrolled_students_count.eq(lessons::enrolled_students_count - 1),
            lessons::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(diesel_error)
    }

    async fn stats(&self) -> Result<LessonStats, LessonPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let (total_lessons, total_capacity, total_enrollments): (i64, Option<i64>, Option<i64>) =
            lessons::table
                .filter(lessons::is_active.eq(true))
                .select((
                    count_star(),
                    sum(lessons::max_capacity),
                    sum(lessons::enrolled_students_count),
                ))
                .first(&mut conn)
                .await
                .map_err(diesel_error)?;

        Ok(LessonStats {
            total_lessons,
            total_capacity: total_capacity.unwrap_or(0),
            total_enrollments: total_enrollments.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use crate::domain::LessonDraft;

    use super::*;

    #[fixture]
    fn valid_row() -> LessonRow {
        let lesson = Lesson::new(LessonDraft {
            name: "Linear Algebra".to_owned(),
            description: None,
            code: "MATH101".to_owned(),
            credits: 4,
            instructor: None,
            max_capacity: Some(30),
        })
        .expect("valid draft");

        LessonRow {
            id: lesson.id,
            name: lesson.name,
            description: lesson.description,
            code: lesson.code,
            credits: lesson.credits,
            instructor: lesson.instructor,
            max_capacity: lesson.max_capacity,
            enrolled_students_count: 12,
            is_active: lesson.is_active,
            created_at: lesson.created_at,
            updated_at: lesson.updated_at,
        }
    }

    #[rstest]
    fn row_conversion_preserves_seat_counts(valid_row: LessonRow) {
        let lesson = row_to_lesson(valid_row);
        assert_eq!(lesson.enrolled_students_count, 12);
        assert_eq!(lesson.available_spots(), 18);
    }

    #[rstest]
    fn code_constraint_maps_to_duplicate_code() {
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
                Some("lessons")
            }
            fn column_name(&self) -> Option<&str> {
                None
            }
            fn constraint_name(&self) -> Option<&str> {
                Some("lessons_code_key")
            }
            fn statement_position(&self) -> Option<i32> {
                None
            }
        }

        let err = DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(Info));
        let mapped = write_error("Linear Algebra", "MATH101", err);
        assert!(matches!(mapped, LessonPersistenceError::DuplicateCode { .. }));
        assert!(mapped.to_string().contains("MATH101"));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, LessonPersistenceError::Connection { .. }));
    }
}
