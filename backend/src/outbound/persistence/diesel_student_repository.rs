//! PostgreSQL-backed `StudentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{
    PageOf, StudentPersistenceError, StudentRepository, UserCredentials,
};
use crate::domain::{ProfileUpdate, StudentUpdate, User, UserRole};

use super::diesel_error_mapping::{
    map_diesel_error, map_pool_error, unique_violation_constraint,
};
use super::models::{NewUserRow, ProfileChangeset, StudentChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the student repository port.
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> StudentPersistenceError {
    map_pool_error(error, StudentPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> StudentPersistenceError {
    map_diesel_error(
        error,
        StudentPersistenceError::query,
        StudentPersistenceError::connection,
    )
}

fn insert_error(email: &str, error: diesel::result::Error) -> StudentPersistenceError {
    if unique_violation_constraint(&error).is_some_and(|name| name.contains("email")) {
        return StudentPersistenceError::duplicate_email(email);
    }
    diesel_error(error)
}

/// Convert a database row into a domain user, rejecting unknown role strings.
fn row_to_user(row: UserRow) -> Result<User, StudentPersistenceError> {
    let role: UserRole = row
        .role
        .parse()
        .map_err(|_| StudentPersistenceError::query(format!("unknown role: {}", row.role)))?;

    Ok(User {
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        date_of_birth: row.date_of_birth,
        role,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<(), StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let new_row = NewUserRow {
            id: user.id,
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: &user.email,
            password_hash,
            date_of_birth: user.date_of_birth,
            role: user.role.as_str(),
            is_active: user.is_active,
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| insert_error(&user.email, err))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = users::table
            .filter(users::id.eq(id).and(users::is_active.eq(true)))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = users::table
            .filter(users::email.eq(email).and(users::is_active.eq(true)))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(|row| {
            let password_hash = row.password_hash.clone();
            let user = row_to_user(row)?;
            Ok(UserCredentials {
                user,
                password_hash,
            })
        })
        .transpose()
    }

    async fn find_student(&self, id: Uuid) -> Result<Option<User>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = users::table
            .filter(
                users::id
                    .eq(id)
                    .and(users::role.eq(UserRole::Student.as_str()))
                    .and(users::is_active.eq(true)),
            )
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn list_students<'a>(
        &self,
        page: PageRequest,
        search: Option<&'a str>,
    ) -> Result<PageOf<User>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let mut count_query = users::table
            .filter(
                users::role
                    .eq(UserRole::Student.as_str())
                    .and(users::is_active.eq(true)),
            )
            .select(diesel::dsl::count_star())
            .into_boxed();
        let mut rows_query = users::table
            .filter(
                users::role
                    .eq(UserRole::Student.as_str())
                    .and(users::is_active.eq(true)),
            )
            .select(UserRow::as_select())
            .into_boxed();

        if let Some(term) = search {
            let pattern = format!("%{term}%");
            count_query = count_query.filter(
                users::first_name
                    .ilike(pattern.clone())
                    .or(users::last_name.ilike(pattern.clone()))
                    .or(users::email.ilike(pattern.clone())),
            );
            rows_query = rows_query.filter(
                users::first_name
                    .ilike(pattern.clone())
                    .or(users::last_name.ilike(pattern.clone()))
                    .or(users::email.ilike(pattern)),
            );
        }

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        let rows: Vec<UserRow> = rows_query
            .order(users::created_at.desc())
            .limit(page.limit_i64())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        let items = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageOf {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn update_student(
        &self,
        id: Uuid,
        update: &StudentUpdate,
    ) -> Result<Option<User>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let changeset = StudentChangeset {
            first_name: &update.first_name,
            last_name: &update.last_name,
            email: &update.email,
            date_of_birth: update.date_of_birth,
            updated_at: Utc::now(),
        };

        let row = diesel::update(
            users::table.filter(
                users::id
                    .eq(id)
                    .and(users::role.eq(UserRole::Student.as_str()))
                    .and(users::is_active.eq(true)),
            ),
        )
        .set(&changeset)
        .returning(UserRow::as_returning())
        .get_result::<UserRow>(&mut conn)
        .await
        .optional()
        .map_err(|err| insert_error(&update.email, err))?;

        row.map(row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let changeset = ProfileChangeset {
            first_name: &update.first_name,
            last_name: &update.last_name,
            date_of_birth: update.date_of_birth,
            updated_at: Utc::now(),
        };

        let row = diesel::update(
            users::table.filter(
                users::id
                    .eq(id)
                    .and(users::role.eq(UserRole::Student.as_str()))
                    .and(users::is_active.eq(true)),
            ),
        )
        .set(&changeset)
        .returning(UserRow::as_returning())
        .get_result::<UserRow>(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn delete_student(&self, id: Uuid) -> Result<bool, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let changed = diesel::update(
            users::table.filter(
                users::id
                    .eq(id)
                    .and(users::role.eq(UserRole::Student.as_str()))
                    .and(users::is_active.eq(true)),
            ),
        )
        .set((users::is_active.eq(false), users::updated_at.eq(Utc::now())))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;

        Ok(changed > 0)
    }
}
