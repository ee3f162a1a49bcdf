//! In-memory property store
//!
//! Nothing is persisted: ids restart on every process. New ids follow the
//! highest stored id, so an empty store hands out 1, 2, 3, ... and a new
//! listing never overwrites a seeded one.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::PropertyStore;
use crate::config::PropertyBackend;
use crate::error::{DbError, Result};
use crate::models::{NewProperty, Property};

/// Fixture layouts: an object keyed by id, or a plain list
#[derive(Deserialize)]
#[serde(untagged)]
enum Fixture {
    Keyed(BTreeMap<String, Property>),
    List(Vec<Property>),
}

/// Process-local property table
#[derive(Debug, Default)]
pub struct InMemoryPropertyStore {
    properties: Mutex<BTreeMap<i32, Property>>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing properties, keyed by their ids.
    pub fn with_properties(properties: impl IntoIterator<Item = Property>) -> Self {
        let properties = properties.into_iter().map(|p| (p.id, p)).collect();
        Self {
            properties: Mutex::new(properties),
        }
    }

    /// Parse a JSON fixture (`{"1": {...}, "2": {...}}` or `[{...}, ...]`).
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: Fixture =
            serde_json::from_str(json).map_err(|e| DbError::fixture("properties fixture", e))?;

        let properties = match fixture {
            Fixture::Keyed(map) => map.into_values().collect::<Vec<_>>(),
            Fixture::List(list) => list,
        };
        Ok(Self::with_properties(properties))
    }

    /// Read and parse a JSON fixture file.
    pub async fn load_fixture(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        let store = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            count = store.len().await,
            "seeded in-memory property store"
        );
        Ok(store)
    }

    pub async fn len(&self) -> usize {
        self.properties.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.properties.lock().await.is_empty()
    }

    pub async fn get(&self, id: i32) -> Option<Property> {
        self.properties.lock().await.get(&id).cloned()
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn add_property(&self, property: NewProperty) -> Result<Property> {
        property.validate()?;

        // Held across id assignment and insert, so concurrent adds never
        // share an id.
        let mut properties = self.properties.lock().await;
        let id = properties.keys().next_back().map_or(1, |last| last + 1);
        let property = property.into_property(id);
        properties.insert(id, property.clone());

        debug!(op = "add_property", id, "stored property in memory");
        Ok(property)
    }

    fn backend(&self) -> PropertyBackend {
        PropertyBackend::Memory
    }
}
