//! User rows and new-user validation

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Column width of `users.name` and `users.email`
const MAX_FIELD_LEN: usize = 255;

/// One `@`, no whitespace, at least one dot in the domain
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

/// User record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Stored hash; never hashed or compared here
    pub password: String,
}

/// Validated input for inserting a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
    password: String,
}

/// Email as stored and looked up: surrounding whitespace removed, case kept.
pub fn normalize_email(email: &str) -> &str {
    email.trim()
}

impl NewUser {
    /// Create a new user record, validating each field.
    ///
    /// # Rules
    /// - Name non-empty after trimming, max 255 characters
    /// - Email in `local@domain.tld` form, max 255 characters
    /// - Password non-empty (expected to be hashed already)
    ///
    /// # Example
    /// ```
    /// use lightbnb_db::models::NewUser;
    ///
    /// assert!(NewUser::new("Ada", "ada@example.com", "$2a$10$hash").is_ok());
    /// assert!(NewUser::new("Ada", "not-an-email", "$2a$10$hash").is_err());
    /// ```
    pub fn new(name: &str, email: &str, password: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if name.len() > MAX_FIELD_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_FIELD_LEN,
            });
        }

        let email = normalize_email(email);
        if email.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if email.len() > MAX_FIELD_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_FIELD_LEN,
            });
        }
        if !EMAIL_RE.is_match(email) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@example.com",
            });
        }

        if password.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }

        Ok(Self {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}
