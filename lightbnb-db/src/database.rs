//! Database handle shared by the route layer

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::DbConfig;
use crate::db::{create_pool, PropertyRepo, ReservationRepo, UserRepo};
use crate::error::Result;
use crate::models::{
    NewProperty, NewUser, Property, PropertyFilter, PropertyWithRating, ReservationSummary,
    ResultLimit, User,
};
use crate::store::{self, PropertyStore};

/// Owns the pool and the property store; cheap to clone.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

struct DatabaseInner {
    pool: PgPool,
    properties: Arc<dyn PropertyStore>,
}

impl Database {
    pub fn new(pool: PgPool, properties: Arc<dyn PropertyStore>) -> Self {
        Self {
            inner: Arc::new(DatabaseInner { pool, properties }),
        }
    }

    /// Connect the pool and build the configured property store.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        let pool = create_pool(config).await?;
        Self::with_pool(pool, config).await
    }

    /// Use an existing pool; the property store still comes from `config`.
    pub async fn with_pool(pool: PgPool, config: &DbConfig) -> Result<Self> {
        let properties = store::from_config(config, &pool).await?;
        Ok(Self::new(pool, properties))
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    pub fn users(&self) -> UserRepo<'_> {
        UserRepo::new(&self.inner.pool)
    }

    pub fn reservations(&self) -> ReservationRepo<'_> {
        ReservationRepo::new(&self.inner.pool)
    }

    pub fn properties(&self) -> PropertyRepo<'_> {
        PropertyRepo::new(&self.inner.pool)
    }

    pub fn property_store(&self) -> &dyn PropertyStore {
        self.inner.properties.as_ref()
    }

    /// Get a single user by email; `None` if no user has it.
    pub async fn get_user_with_email(&self, email: &str) -> Result<Option<User>> {
        self.users().get_with_email(email).await
    }

    /// Get a single user by id; `None` if there is no such user.
    pub async fn get_user_with_id(&self, id: i32) -> Result<Option<User>> {
        self.users().get_with_id(id).await
    }

    /// Add a user. The password must already be hashed.
    pub async fn add_user(&self, user: NewUser) -> Result<User> {
        self.users().add(user).await
    }

    /// A guest's reservations, earliest first (default limit 10).
    pub async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: impl Into<ResultLimit>,
    ) -> Result<Vec<ReservationSummary>> {
        self.reservations()
            .list_for_guest(guest_id, limit.into())
            .await
    }

    /// Properties matching `filter`, cheapest first (default limit 10).
    pub async fn get_all_properties(
        &self,
        filter: &PropertyFilter,
        limit: impl Into<ResultLimit>,
    ) -> Result<Vec<PropertyWithRating>> {
        self.properties().search(filter, limit.into()).await
    }

    /// Add a property through the configured store.
    pub async fn add_property(&self, property: NewProperty) -> Result<Property> {
        self.inner.properties.add_property(property).await
    }
}
