//! Repository implementations for database access
//!
//! Each repository borrows the pool and follows these patterns:
//! - Values are always bound as positional parameters
//! - Aggregates come from a single JOIN query (no N+1)
//! - Rely on DB constraints, map conflicts (no check-then-insert)

pub mod users;
pub mod reservations;
pub mod properties;

pub use users::UserRepo;
pub use reservations::ReservationRepo;
pub use properties::PropertyRepo;
