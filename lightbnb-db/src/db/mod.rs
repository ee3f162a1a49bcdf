//! Database layer - connection pool, repositories, and query building
//!
//! # Design Principles
//!
//! - One shared PgPool, borrowed by every repository
//! - Every value bound as a positional parameter, never formatted into SQL
//! - Aggregates computed by the database with JOIN + GROUP BY
//! - Errors propagate; not-found is `Ok(None)`

pub mod pool;
pub mod query;
pub mod repos;

pub use pool::{create_lazy_pool, create_pool};
pub use query::{PropertyQuery, QueryParam};
pub use repos::*;
