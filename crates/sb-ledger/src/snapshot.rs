//! Ledger snapshots stored as JSON.
//!
//! A snapshot captures what the staking contract would report at one
//! moment, so dashboards can be rendered offline:
//!
//! ```json
//! {
//!   "as_of": 1750000000,
//!   "categories": ["Warrior", "Mage"],
//!   "stakers": [
//!     { "address": "0xabc...", "items": [
//!         { "id": 7, "category": "Warrior", "staked_at": 1749000000 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! When `as_of` is present elapsed times are measured against it; otherwise
//! the source's clock is used at fetch time.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use sb_core::{EntityKey, RecordSource, SourceError, SubRecord};

use crate::{Clock, LedgerError, SystemClock};

/// Snapshot file contents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    /// Unix time the snapshot was taken.
    #[serde(default)]
    pub as_of: Option<i64>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub stakers: Vec<SnapshotEntity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapshotEntity {
    pub address: EntityKey,
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnapshotItem {
    pub id: u64,
    pub category: String,
    pub staked_at: i64,
}

impl Snapshot {
    /// Parses and validates snapshot JSON.
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|err| LedgerError::Snapshot(err.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reads and validates a snapshot file.
    pub fn read(path: &Path) -> Result<Self, LedgerError> {
        let json = std::fs::read_to_string(path).map_err(|source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Rejects duplicate addresses and timestamps before the unix epoch.
    fn validate(&self) -> Result<(), LedgerError> {
        if let Some(as_of) = self.as_of.filter(|t| *t < 0) {
            return Err(LedgerError::Snapshot(format!("as_of {as_of} is negative")));
        }
        let mut seen = HashSet::new();
        for staker in &self.stakers {
            if !seen.insert(staker.address.as_str()) {
                return Err(LedgerError::Snapshot(format!(
                    "duplicate staker address {}",
                    staker.address
                )));
            }
            if let Some(item) = staker.items.iter().find(|item| item.staked_at < 0) {
                return Err(LedgerError::Snapshot(format!(
                    "item {} of {} has negative staked_at {}",
                    item.id, staker.address, item.staked_at
                )));
            }
        }
        Ok(())
    }
}

/// A [`RecordSource`] backed by an in-memory [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: Snapshot,
    clock: Arc<dyn Clock>,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            clock: Arc::new(SystemClock),
        }
    }

    /// Reads a snapshot file.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let snapshot = Snapshot::read(path)?;
        tracing::debug!(
            path = %path.display(),
            stakers = snapshot.stakers.len(),
            "opened ledger snapshot"
        );
        Ok(Self::new(snapshot))
    }

    /// Replaces the clock used when the snapshot has no `as_of`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> i64 {
        self.snapshot.as_of.unwrap_or_else(|| self.clock.now())
    }
}

#[async_trait]
impl RecordSource for SnapshotSource {
    async fn list_categories(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.snapshot.categories.clone())
    }

    async fn count_entities(&self) -> Result<u64, SourceError> {
        u64::try_from(self.snapshot.stakers.len()).map_err(|err| SourceError::Malformed {
            operation: "count_entities",
            message: err.to_string(),
        })
    }

    async fn list_entity_keys(&self, page: u64, limit: u64) -> Result<Vec<EntityKey>, SourceError> {
        let start = page.saturating_mul(limit);
        let start = usize::try_from(start).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .snapshot
            .stakers
            .iter()
            .skip(start)
            .take(limit)
            .map(|staker| staker.address.clone())
            .collect())
    }

    async fn fetch_sub_records(&self, key: &EntityKey) -> Result<Vec<SubRecord>, SourceError> {
        let now = self.now();
        let staker = self
            .snapshot
            .stakers
            .iter()
            .find(|staker| &staker.address == key)
            .ok_or_else(|| SourceError::Rejected {
                operation: "fetch_sub_records",
                message: format!("unknown staker {key}"),
            })?;
        Ok(staker
            .items
            .iter()
            .map(|item| SubRecord::observed(item.id, item.category.clone(), item.staked_at, now))
            .collect())
    }
}
