//! Listing search query builder
//!
//! Assembles the property search SQL from whichever filters are present.
//! Values never enter the SQL text: each one is pushed onto the parameter
//! list and referenced as `$n`, where `n` is the list length after the push.
//! The limit is always the last parameter.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

use crate::models::{PropertyFilter, PropertyWithRating, ResultLimit};

const SELECT_WITH_RATING: &str = "\
SELECT properties.*, AVG(property_reviews.rating)::float8 AS average_rating
FROM properties
LEFT JOIN property_reviews ON properties.id = property_reviews.property_id";

/// A positional parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    Int(i32),
    BigInt(i64),
    Float(f64),
}

/// Built property search: SQL text plus its parameters in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuery {
    sql: String,
    params: Vec<QueryParam>,
}

impl PropertyQuery {
    /// Build the search for `filter`, returning at most `limit` rows.
    ///
    /// Clause order is fixed: city, owner, price range, minimum rating.
    /// WHERE clauses are joined with AND. The rating bound applies to the
    /// aggregate, so it lands in HAVING after the GROUP BY.
    pub fn build(filter: &PropertyFilter, limit: ResultLimit) -> Self {
        let mut params = Vec::new();
        let mut where_clauses = Vec::new();
        let mut having = None;

        if let Some(city) = filter.city() {
            params.push(QueryParam::Text(format!("%{}%", escape_like(city))));
            where_clauses.push(format!("properties.city ILIKE ${}", params.len()));
        }

        if let Some(owner_id) = filter.owner_id {
            params.push(QueryParam::Int(owner_id));
            where_clauses.push(format!("properties.owner_id = ${}", params.len()));
        }

        if let Some((min_cents, max_cents)) = filter.price_range_cents() {
            params.push(QueryParam::BigInt(min_cents));
            params.push(QueryParam::BigInt(max_cents));
            where_clauses.push(format!(
                "properties.cost_per_night BETWEEN ${} AND ${}",
                params.len() - 1,
                params.len()
            ));
        }

        if let Some(rating) = filter.minimum_rating {
            params.push(QueryParam::Float(rating));
            having = Some(format!(
                "AVG(property_reviews.rating) >= ${}",
                params.len()
            ));
        }

        let mut sql = String::from(SELECT_WITH_RATING);

        if !where_clauses.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&where_clauses.join(" AND "));
        }

        sql.push_str("\nGROUP BY properties.id");

        if let Some(having) = having {
            sql.push_str("\nHAVING ");
            sql.push_str(&having);
        }

        params.push(QueryParam::BigInt(limit.get()));
        sql.push_str(&format!(
            "\nORDER BY properties.cost_per_night, properties.id\nLIMIT ${}",
            params.len()
        ));

        Self { sql, params }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }

    /// Bind every parameter, in order, onto a typed query.
    pub fn as_query(&self) -> QueryAs<'_, Postgres, PropertyWithRating, PgArguments> {
        let mut query = sqlx::query_as::<_, PropertyWithRating>(&self.sql);
        for param in &self.params {
            query = match param {
                QueryParam::Text(value) => query.bind(value.as_str()),
                QueryParam::Int(value) => query.bind(*value),
                QueryParam::BigInt(value) => query.bind(*value),
                QueryParam::Float(value) => query.bind(*value),
            };
        }
        query
    }
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use once_cell::sync::Lazy;
    use proptest::prelude::*;
    use regex::Regex;

    use super::*;

    static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(\d+)").unwrap());

    fn placeholders(sql: &str) -> BTreeSet<usize> {
        PLACEHOLDER_RE
            .captures_iter(sql)
            .map(|c| c[1].parse().unwrap())
            .collect()
    }

    /// Placeholders must be exactly $1..=$n with n == params.len()
    fn assert_params_match(query: &PropertyQuery) {
        let found = placeholders(query.sql());
        let expected: BTreeSet<usize> = (1..=query.params().len()).collect();
        assert_eq!(found, expected, "sql: {}", query.sql());
    }

    #[test]
    fn no_filters() {
        let query = PropertyQuery::build(&PropertyFilter::default(), ResultLimit::default());
        assert!(!query.sql().contains("WHERE"));
        assert!(!query.sql().contains("HAVING"));
        assert!(query.sql().contains("GROUP BY properties.id"));
        assert!(query.sql().ends_with("LIMIT $1"));
        assert_eq!(query.params(), &[QueryParam::BigInt(10)]);
    }

    #[test]
    fn zero_limit_is_bound_as_zero() {
        let query = PropertyQuery::build(&PropertyFilter::default(), ResultLimit::from(0u32));
        assert_eq!(query.params(), &[QueryParam::BigInt(0)]);
    }

    #[test]
    fn city_is_wrapped_in_wildcards() {
        let filter = PropertyFilter::default().with_city("Vancouver");
        let query = PropertyQuery::build(&filter, ResultLimit::new(3));
        assert!(query.sql().contains("WHERE properties.city ILIKE $1"));
        assert_eq!(
            query.params(),
            &[
                QueryParam::Text("%Vancouver%".to_string()),
                QueryParam::BigInt(3)
            ]
        );
    }

    #[test]
    fn city_wildcards_are_escaped() {
        let filter = PropertyFilter::default().with_city("50%_off\\");
        let query = PropertyQuery::build(&filter, ResultLimit::default());
        assert_eq!(
            query.params()[0],
            QueryParam::Text("%50\\%\\_off\\\\%".to_string())
        );
    }

    #[test]
    fn price_range_in_cents() {
        let filter = PropertyFilter::default().with_price_range(100.0, 200.0);
        let query = PropertyQuery::build(&filter, ResultLimit::default());
        assert!(query
            .sql()
            .contains("WHERE properties.cost_per_night BETWEEN $1 AND $2"));
        assert_eq!(
            &query.params()[..2],
            &[QueryParam::BigInt(10_000), QueryParam::BigInt(20_000)]
        );
    }

    #[test]
    fn single_price_bound_is_ignored() {
        let filter = PropertyFilter {
            minimum_price_per_night: Some(100.0),
            ..Default::default()
        };
        let query = PropertyQuery::build(&filter, ResultLimit::default());
        assert!(!query.sql().contains("cost_per_night BETWEEN"));
        assert!(!query.sql().contains("WHERE"));
        assert_eq!(query.params(), &[QueryParam::BigInt(10)]);
    }

    #[test]
    fn rating_filters_the_aggregate() {
        let filter = PropertyFilter::default()
            .with_owner(4)
            .with_minimum_rating(4.0);
        let query = PropertyQuery::build(&filter, ResultLimit::default());
        assert!(query.sql().contains("WHERE properties.owner_id = $1"));
        assert!(query
            .sql()
            .contains("HAVING AVG(property_reviews.rating) >= $2"));
        assert!(query.sql().find("GROUP BY") < query.sql().find("HAVING"));
        assert_eq!(
            query.params(),
            &[
                QueryParam::Int(4),
                QueryParam::Float(4.0),
                QueryParam::BigInt(10)
            ]
        );
    }

    #[test]
    fn all_filters_in_append_order() {
        let filter = PropertyFilter::default()
            .with_city("Van")
            .with_owner(2)
            .with_price_range(50.0, 75.0)
            .with_minimum_rating(3.5);
        let query = PropertyQuery::build(&filter, ResultLimit::new(20));

        assert!(query.sql().contains(
            "WHERE properties.city ILIKE $1 AND properties.owner_id = $2 \
             AND properties.cost_per_night BETWEEN $3 AND $4"
        ));
        assert!(query.sql().contains("HAVING AVG(property_reviews.rating) >= $5"));
        assert!(query.sql().ends_with("LIMIT $6"));
        assert_eq!(
            query.params(),
            &[
                QueryParam::Text("%Van%".to_string()),
                QueryParam::Int(2),
                QueryParam::BigInt(5_000),
                QueryParam::BigInt(7_500),
                QueryParam::Float(3.5),
                QueryParam::BigInt(20),
            ]
        );
        assert_params_match(&query);
    }

    #[test]
    fn every_option_combination_matches_placeholders() {
        for mask in 0u8..32 {
            let filter = PropertyFilter {
                city: (mask & 1 != 0).then(|| "Toronto".to_string()),
                owner_id: (mask & 2 != 0).then_some(7),
                minimum_price_per_night: (mask & 4 != 0).then_some(80.0),
                maximum_price_per_night: (mask & 8 != 0).then_some(120.0),
                minimum_rating: (mask & 16 != 0).then_some(4.0),
            };
            assert_params_match(&PropertyQuery::build(&filter, ResultLimit::default()));
        }
    }

    proptest! {
        #[test]
        fn arbitrary_filters_match_placeholders(
            city in proptest::option::of(".{0,12}"),
            owner_id in proptest::option::of(any::<i32>()),
            min_price in proptest::option::of(0.0f64..10_000.0),
            max_price in proptest::option::of(0.0f64..10_000.0),
            rating in proptest::option::of(0.0f64..5.0),
            limit in 0u32..2_000,
        ) {
            let filter = PropertyFilter {
                city,
                owner_id,
                minimum_price_per_night: min_price,
                maximum_price_per_night: max_price,
                minimum_rating: rating,
            };
            let query = PropertyQuery::build(&filter, ResultLimit::new(limit));
            let found = placeholders(query.sql());
            let expected: BTreeSet<usize> = (1..=query.params().len()).collect();
            prop_assert_eq!(found, expected);
        }
    }
}
