//! Result limit for list queries

use serde::{Deserialize, Serialize};

/// Default number of rows returned by list queries
pub const DEFAULT_LIMIT: u32 = 10;

/// Maximum rows a single list query may return
const MAX_LIMIT: u32 = 1_000;

/// Upper bound on rows returned by a list query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct ResultLimit(u32);

impl ResultLimit {
    /// Create a limit, capped at 1000. Zero is kept and yields an empty page.
    pub fn new(limit: u32) -> Self {
        Self(limit.min(MAX_LIMIT))
    }

    /// Get the limit as bound to `LIMIT $n`.
    pub fn get(&self) -> i64 {
        i64::from(self.0)
    }
}

impl Default for ResultLimit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

impl From<u32> for ResultLimit {
    fn from(limit: u32) -> Self {
        Self::new(limit)
    }
}

impl From<Option<u32>> for ResultLimit {
    fn from(limit: Option<u32>) -> Self {
        limit.map(Self::new).unwrap_or_default()
    }
}

impl From<ResultLimit> for u32 {
    fn from(limit: ResultLimit) -> Self {
        limit.0
    }
}
