//! Row types and validated inputs
//!
//! Rows derive `FromRow` and map one-to-one onto query columns.
//! Inputs are validated when constructed; invalid input returns
//! ValidationError, not panic.

pub mod validation;
pub mod user;
pub mod reservation;
pub mod property;
pub mod filter;
pub mod limit;

pub use validation::ValidationError;
pub use user::{normalize_email, NewUser, User};
pub use reservation::ReservationSummary;
pub use property::{NewProperty, Property, PropertyWithRating};
pub use filter::PropertyFilter;
pub use limit::{ResultLimit, DEFAULT_LIMIT};
