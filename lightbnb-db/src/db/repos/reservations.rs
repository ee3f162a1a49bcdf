//! Reservation repository
//!
//! A guest's reservations joined with property details and the mean rating
//! of the reviews left for each reservation.

use sqlx::PgPool;
use tracing::debug;

use crate::error::Result;
use crate::models::{ReservationSummary, ResultLimit};

/// Reservation repository
pub struct ReservationRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReservationRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a guest's reservations, earliest start date first.
    ///
    /// Only reservations with at least one review are returned (inner join on
    /// `property_reviews`). Ties on start date fall back to reservation id so
    /// the order is stable.
    pub async fn list_for_guest(
        &self,
        guest_id: i32,
        limit: ResultLimit,
    ) -> Result<Vec<ReservationSummary>> {
        debug!(op = "get_all_reservations", guest_id, limit = limit.get(), "querying reservations");

        let rows: Vec<ReservationSummary> = sqlx::query_as(
            r#"
            SELECT
                reservations.id AS id,
                properties.id AS property_id,
                reservations.guest_id AS guest_id,
                properties.title AS title,
                properties.cost_per_night AS cost_per_night,
                reservations.start_date AS start_date,
                AVG(property_reviews.rating)::float8 AS average_rating
            FROM property_reviews
            JOIN reservations ON reservations.id = property_reviews.reservation_id
            JOIN properties ON properties.id = property_reviews.property_id
            WHERE reservations.guest_id = $1
            GROUP BY reservations.id, properties.id, properties.title,
                     properties.cost_per_night, reservations.start_date
            ORDER BY reservations.start_date, reservations.id
            LIMIT $2
            "#,
        )
        .bind(guest_id)
        .bind(limit.get())
        .fetch_all(self.pool)
        .await?;

        debug!(op = "get_all_reservations", rows = rows.len(), "query complete");
        Ok(rows)
    }
}
