//! Shared setup for database integration tests.
//!
//! Each test gets its own schema so tests can run in parallel against one
//! database. Run with: DATABASE_URL=postgres://... cargo test -p lightbnb-db -- --ignored

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{NaiveDate, Utc};
use lightbnb_db::{DbConfig, NewProperty};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

static SCHEMA_COUNTER: AtomicUsize = AtomicUsize::new(0);

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE users (
        id SERIAL PRIMARY KEY NOT NULL,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE properties (
        id SERIAL PRIMARY KEY NOT NULL,
        owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title VARCHAR(255) NOT NULL,
        description TEXT,
        thumbnail_photo_url VARCHAR(255) NOT NULL,
        cover_photo_url VARCHAR(255) NOT NULL,
        cost_per_night INTEGER NOT NULL DEFAULT 0,
        parking_spaces INTEGER NOT NULL DEFAULT 0,
        number_of_bathrooms INTEGER NOT NULL DEFAULT 0,
        number_of_bedrooms INTEGER NOT NULL DEFAULT 0,
        country VARCHAR(255) NOT NULL,
        street VARCHAR(255) NOT NULL,
        city VARCHAR(255) NOT NULL,
        province VARCHAR(255) NOT NULL,
        post_code VARCHAR(255) NOT NULL,
        active BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE reservations (
        id SERIAL PRIMARY KEY NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
        guest_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE property_reviews (
        id SERIAL PRIMARY KEY NOT NULL,
        guest_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
        reservation_id INTEGER NOT NULL REFERENCES reservations(id) ON DELETE CASCADE,
        rating SMALLINT NOT NULL DEFAULT 0,
        message TEXT
    )
    "#,
];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Pool whose connections all use a fresh schema holding the LightBnB tables.
pub async fn test_pool() -> anyhow::Result<PgPool> {
    init_tracing();

    let config = DbConfig::from_env()?;
    let schema = format!(
        "lightbnb_test_{}_{}_{}",
        std::process::id(),
        Utc::now().timestamp_micros(),
        SCHEMA_COUNTER.fetch_add(1, Ordering::SeqCst)
    );

    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(config.connect_options()?)
        .await?;
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&admin)
        .await?;
    admin.close().await;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(
            config
                .connect_options()?
                .options([("search_path", schema.as_str())]),
        )
        .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }

    Ok(pool)
}

pub async fn insert_user(pool: &PgPool, name: &str, email: &str) -> anyhow::Result<i32> {
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO users (name, email, password) VALUES ($1, $2, 'hash') RETURNING id",
    )
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub fn new_property(owner_id: i32, title: &str, city: &str, cost_per_night: i32) -> NewProperty {
    NewProperty {
        owner_id,
        title: title.to_string(),
        description: Some("description".to_string()),
        thumbnail_photo_url: "https://images.example.com/thumb.jpg".to_string(),
        cover_photo_url: "https://images.example.com/cover.jpg".to_string(),
        cost_per_night,
        parking_spaces: 1,
        number_of_bathrooms: 1,
        number_of_bedrooms: 2,
        country: "Canada".to_string(),
        street: "1 Main Street".to_string(),
        city: city.to_string(),
        province: "British Columbia".to_string(),
        post_code: "V5K 0A1".to_string(),
        active: true,
    }
}

pub async fn insert_property(
    pool: &PgPool,
    owner_id: i32,
    title: &str,
    city: &str,
    cost_per_night: i32,
) -> anyhow::Result<i32> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO properties (
            owner_id, title, thumbnail_photo_url, cover_photo_url, cost_per_night,
            country, street, city, province, post_code
        )
        VALUES ($1, $2, 't', 'c', $3, 'Canada', '1 Main Street', $4, 'BC', 'V5K 0A1')
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .bind(title)
    .bind(cost_per_night)
    .bind(city)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Insert a reservation and one review per rating; returns the reservation id.
pub async fn insert_reservation(
    pool: &PgPool,
    guest_id: i32,
    property_id: i32,
    start_date: NaiveDate,
    ratings: &[i16],
) -> anyhow::Result<i32> {
    let (reservation_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO reservations (start_date, end_date, property_id, guest_id)
        VALUES ($1, $1 + 3, $2, $3)
        RETURNING id
        "#,
    )
    .bind(start_date)
    .bind(property_id)
    .bind(guest_id)
    .fetch_one(pool)
    .await?;

    for rating in ratings {
        sqlx::query(
            r#"
            INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(guest_id)
        .bind(property_id)
        .bind(reservation_id)
        .bind(*rating)
        .execute(pool)
        .await?;
    }

    Ok(reservation_id)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
