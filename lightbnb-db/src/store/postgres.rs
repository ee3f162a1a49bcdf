//! PostgreSQL property store

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::PropertyStore;
use crate::config::PropertyBackend;
use crate::error::{DbError, Result};
use crate::models::{NewProperty, Property};

/// Inserts into the `properties` table; the database assigns the id.
#[derive(Debug, Clone)]
pub struct PgPropertyStore {
    pool: PgPool,
}

impl PgPropertyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyStore for PgPropertyStore {
    async fn add_property(&self, property: NewProperty) -> Result<Property> {
        property.validate()?;
        debug!(op = "add_property", owner_id = property.owner_id, "inserting property");

        sqlx::query_as(
            r#"
            INSERT INTO properties (
                owner_id, title, description, thumbnail_photo_url, cover_photo_url,
                cost_per_night, parking_spaces, number_of_bathrooms, number_of_bedrooms,
                country, street, city, province, post_code, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(property.owner_id)
        .bind(&property.title)
        .bind(property.description.as_deref())
        .bind(&property.thumbnail_photo_url)
        .bind(&property.cover_photo_url)
        .bind(property.cost_per_night)
        .bind(property.parking_spaces)
        .bind(property.number_of_bathrooms)
        .bind(property.number_of_bedrooms)
        .bind(&property.country)
        .bind(&property.street)
        .bind(&property.city)
        .bind(&property.province)
        .bind(&property.post_code)
        .bind(property.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_write("property", e))
    }

    fn backend(&self) -> PropertyBackend {
        PropertyBackend::Postgres
    }
}
