//! Property repository
//!
//! Filtered listing search. The SQL is assembled by [`PropertyQuery`].

use sqlx::PgPool;
use tracing::debug;

use crate::db::query::PropertyQuery;
use crate::error::Result;
use crate::models::{PropertyFilter, PropertyWithRating, ResultLimit};

/// Property repository
pub struct PropertyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PropertyRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Search properties, cheapest first, each with its average rating.
    pub async fn search(
        &self,
        filter: &PropertyFilter,
        limit: ResultLimit,
    ) -> Result<Vec<PropertyWithRating>> {
        let query = PropertyQuery::build(filter, limit);
        debug!(
            op = "get_all_properties",
            params = query.params().len(),
            "querying properties"
        );

        let rows = query.as_query().fetch_all(self.pool).await?;

        debug!(op = "get_all_properties", rows = rows.len(), "query complete");
        Ok(rows)
    }
}
