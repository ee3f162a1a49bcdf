//! Input checks for users and listings

use thiserror::Error;

/// A user or property field that cannot be stored as given
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    /// Length limit of the backing `VARCHAR` column
    #[error("{field} is longer than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} is malformed: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Prices and room counts
    #[error("{field} must be zero or more")]
    Negative { field: &'static str },
}

impl ValidationError {
    /// Name of the offending field, for form error placement.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::Negative { field } => field,
        }
    }
}
