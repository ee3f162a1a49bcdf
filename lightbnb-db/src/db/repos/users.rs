//! User repository
//!
//! Point lookups by email or id, and insert. Lookups return `Ok(None)` when
//! no row matches; errors always propagate.

use sqlx::PgPool;
use tracing::debug;

use crate::error::{DbError, Result};
use crate::models::{normalize_email, NewUser, User};

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a single user by email, normalized the same way as on insert.
    pub async fn get_with_email(&self, email: &str) -> Result<Option<User>> {
        debug!(op = "get_user_with_email", "querying users");

        let user: Option<User> = sqlx::query_as(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a single user by id.
    pub async fn get_with_id(&self, id: i32) -> Result<Option<User>> {
        debug!(op = "get_user_with_id", id, "querying users");

        let user: Option<User> = sqlx::query_as(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a user and return the stored row with its generated id.
    ///
    /// No check-then-insert: a duplicate email is rejected by the unique
    /// constraint and surfaces as [`DbError::Conflict`].
    pub async fn add(&self, user: NewUser) -> Result<User> {
        debug!(op = "add_user", "inserting user");

        sqlx::query_as(
            r#"
            INSERT INTO users (name, password, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password
            "#,
        )
        .bind(user.name())
        .bind(user.password())
        .bind(user.email())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::from_write("user", e))
    }
}
