//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. When a
//! migration changes the schema, update this file to match (or regenerate it
//! with `diesel print-schema` against a migrated database).

diesel::table! {
    /// User accounts, both administrators and students.
    ///
    /// `email` carries a unique constraint (`users_email_key`). Accounts are
    /// soft-deleted via `is_active`.
    users (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        date_of_birth -> Date,
        /// Either `admin` or `student`.
        role -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Course offerings.
    ///
    /// `name` and `code` each carry a unique constraint (`lessons_name_key`,
    /// `lessons_code_key`). `enrolled_students_count` is only ever mutated
    /// through conditional seat updates.
    lessons (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        code -> Varchar,
        credits -> Int4,
        instructor -> Nullable<Varchar>,
        max_capacity -> Int4,
        enrolled_students_count -> Int4,
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Student registrations in lessons.
    ///
    /// A partial unique index (`enrollments_active_student_lesson_idx`) on
    /// `(student_id, lesson_id)` where `status = 'active'` rules out
    /// concurrent duplicate enrollments while keeping dropped history rows.
    enrollments (id) {
        id -> Uuid,
        student_id -> Uuid,
        lesson_id -> Uuid,
        enrolled_at -> Timestamptz,
        /// Either `active` or `dropped`.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(enrollments -> users (student_id));
diesel::joinable!(enrollments -> lessons (lesson_id));

diesel::allow_tables_to_appear_in_same_query!(users, lessons, enrollments);
