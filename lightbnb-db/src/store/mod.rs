//! Property store trait and implementations
//!
//! `add_property` goes through [`PropertyStore`] so the backend can be
//! chosen by configuration:
//! - [`PgPropertyStore`] inserts into the `properties` table
//! - [`InMemoryPropertyStore`] keeps a process-local map (stub/testing)

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::config::{DbConfig, PropertyBackend};
use crate::error::Result;
use crate::models::{NewProperty, Property};

pub use memory::InMemoryPropertyStore;
pub use postgres::PgPropertyStore;

/// Destination for newly listed properties
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Store a property, assigning its id, and return the stored record.
    async fn add_property(&self, property: NewProperty) -> Result<Property>;

    /// Short backend name for logs
    fn backend(&self) -> PropertyBackend;
}

/// Build the property store selected by `config`.
///
/// The in-memory backend is seeded from `config.property_fixture` when set.
pub async fn from_config(config: &DbConfig, pool: &PgPool) -> Result<Arc<dyn PropertyStore>> {
    let store: Arc<dyn PropertyStore> = match config.property_store {
        PropertyBackend::Postgres => Arc::new(PgPropertyStore::new(pool.clone())),
        PropertyBackend::Memory => match &config.property_fixture {
            Some(path) => Arc::new(InMemoryPropertyStore::load_fixture(path).await?),
            None => Arc::new(InMemoryPropertyStore::new()),
        },
    };

    info!(backend = ?store.backend(), "property store ready");
    Ok(store)
}
