//! lightbnb-db: data access for the LightBnB listing app
//!
//! Fetches users, reservations, and property listings from PostgreSQL
//! with parameterized queries, for use by an HTTP route layer.
//!
//! ```ignore
//! let db = Database::connect(&DbConfig::from_env()?).await?;
//! let filter = PropertyFilter::default()
//!     .with_city("Vancouver")
//!     .with_price_range(100.0, 200.0);
//! let listings = db.get_all_properties(&filter, ResultLimit::default()).await?;
//! ```

pub mod config;
pub mod database;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use config::{DbConfig, PropertyBackend};
pub use database::Database;
pub use error::{DbError, Result};
pub use models::{
    NewProperty, NewUser, Property, PropertyFilter, PropertyWithRating, ReservationSummary,
    ResultLimit, User,
};
pub use store::{InMemoryPropertyStore, PgPropertyStore, PropertyStore};
