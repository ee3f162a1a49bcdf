//! Reservation summary rows

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A guest's reservation joined with its property and review aggregate
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ReservationSummary {
    pub id: i32,
    pub property_id: i32,
    pub guest_id: i32,
    pub title: String,
    /// Cents
    pub cost_per_night: i32,
    pub start_date: NaiveDate,
    pub average_rating: Option<f64>,
}
