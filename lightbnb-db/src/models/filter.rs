//! Listing search options
//!
//! Every field is optional. `None` means the caller did not ask for that
//! filter. Forms submit untouched inputs as empty strings, so deserialization
//! treats `""` as absent and accepts numbers either as JSON numbers or as
//! numeric strings.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Optional predicates for a property search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    /// Case-insensitive substring of the city name
    #[serde(default, deserialize_with = "text_or_none")]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "number_or_none")]
    pub owner_id: Option<i32>,

    /// Dollars; only applied together with `maximum_price_per_night`
    #[serde(default, deserialize_with = "finite_or_none")]
    pub minimum_price_per_night: Option<f64>,

    /// Dollars; only applied together with `minimum_price_per_night`
    #[serde(default, deserialize_with = "finite_or_none")]
    pub maximum_price_per_night: Option<f64>,

    /// Inclusive lower bound on the average review rating
    #[serde(default, deserialize_with = "finite_or_none")]
    pub minimum_rating: Option<f64>,
}

impl PropertyFilter {
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_owner(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_price_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum_price_per_night = Some(minimum);
        self.maximum_price_per_night = Some(maximum);
        self
    }

    pub fn with_minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// City to match, ignoring blank input.
    pub fn city(&self) -> Option<&str> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
    }

    /// Price bounds converted to cents.
    ///
    /// Returns `None` unless both bounds are set: a lone minimum or maximum
    /// applies no price filter at all.
    pub fn price_range_cents(&self) -> Option<(i64, i64)> {
        match (self.minimum_price_per_night, self.maximum_price_per_night) {
            (Some(min), Some(max)) => Some((dollars_to_cents(min), dollars_to_cents(max))),
            _ => None,
        }
    }
}

fn dollars_to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn number_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match Option::<NumberOrText<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse::<T>().map(Some).map_err(de::Error::custom)
            }
        }
    }
}

/// Like `number_or_none`, but rejects NaN and infinities.
fn finite_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match number_or_none::<D, f64>(deserializer)? {
        Some(n) if !n.is_finite() => Err(de::Error::custom(format!(
            "expected a finite number, got {n}"
        ))),
        value => Ok(value),
    }
}
