//! Database repository for admin principals.

use crate::database::models::{Admin, CreateAdmin};
use anyhow::Result;
use sqlx::SqlitePool;

/// Repository for admin database operations.
pub struct AdminRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> AdminRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new admin in the database.
    pub async fn create_admin(&self, admin: CreateAdmin) -> Result<Admin> {
        let now = chrono::Utc::now();
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, name, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'admin', ?, ?)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(admin.id)
        .bind(admin.name)
        .bind(admin.email)
        .bind(admin.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(admin)
    }

    /// Retrieves an admin by their unique identifier.
    ///
    /// # Returns
    /// `Some(Admin)` if found, `None` otherwise
    pub async fn get_admin_by_id(&self, id: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM admins WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(admin)
    }

    /// Retrieves an admin by their email.
    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM admins WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(admin)
    }

    /// Checks if an email already exists in the admins table.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM admins WHERE email = ?")
                .bind(email)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }
}
