//! Database repository for student management operations.
//!
//! Provides CRUD operations for student records.

use crate::database::models::{CreateStudent, Student};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for student database operations.
pub struct StudentRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> StudentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new student in the database.
    ///
    /// # Returns
    /// The newly created Student with all fields populated
    pub async fn create_student(&self, student: CreateStudent) -> Result<Student> {
        let now = Utc::now();
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (id, name, email, password_hash, course, enrolled_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, email, password_hash, course, enrolled_at, created_at, updated_at
            "#,
        )
        .bind(student.id)
        .bind(student.name)
        .bind(student.email)
        .bind(student.password_hash)
        .bind(student.course)
        .bind(student.enrolled_at)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(student)
    }

    /// Retrieves a student by their unique identifier.
    ///
    /// # Returns
    /// `Some(Student)` if found, `None` otherwise
    pub async fn get_student_by_id(&self, id: &str) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, email, password_hash, course, enrolled_at, created_at, updated_at
            FROM students WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(student)
    }

    /// Retrieves a student by their email.
    pub async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, email, password_hash, course, enrolled_at, created_at, updated_at
            FROM students WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(student)
    }

    /// Retrieves all students, newest enrollment first.
    pub async fn list_students(&self) -> Result<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, email, password_hash, course, enrolled_at, created_at, updated_at
            FROM students ORDER BY enrolled_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(students)
    }

    /// Checks if an email already exists in the students table.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE email = ?")
                .bind(email)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Checks if an email exists on a student other than the one given.
    pub async fn email_exists_excluding(&self, email: &str, exclude_student_id: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE email = ? AND id != ?")
                .bind(email)
                .bind(exclude_student_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Updates a student's profile fields. `enrolled_at` is never touched.
    ///
    /// # Returns
    /// The updated Student, or `None` if no such student exists
    pub async fn update_student(
        &self,
        id: &str,
        name: &str,
        email: &str,
        course: &str,
    ) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET name = ?, email = ?, course = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, name, email, password_hash, course, enrolled_at, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(course)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(student)
    }

    /// Deletes a student record.
    ///
    /// # Returns
    /// `true` if a record was deleted
    pub async fn delete_student(&self, id: &str) -> Result<bool> {
        let rows_affected = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
