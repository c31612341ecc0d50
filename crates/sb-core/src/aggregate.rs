//! Per-entity rollups of staked sub-records.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::EntityKey;

/// One staked item as reported by a record source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRecord {
    /// Token identifier on the ledger.
    pub id: u64,

    /// Item type, e.g. "Warrior".
    pub category: String,

    /// When the item was staked (unix seconds).
    pub observed_at: i64,

    /// Seconds staked, computed by the source at fetch time.
    pub elapsed: i64,
}

impl SubRecord {
    /// Builds a record whose elapsed time is measured against `now`.
    ///
    /// The difference saturates at the `i64` bounds.
    pub fn observed(id: u64, category: impl Into<String>, observed_at: i64, now: i64) -> Self {
        Self {
            id,
            category: category.into(),
            observed_at,
            elapsed: now.saturating_sub(observed_at),
        }
    }
}

/// A sub-record that was dropped while building an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityWarning {
    pub key: EntityKey,
    pub record_id: u64,
    pub reason: IntegrityIssue,
}

/// Why a sub-record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// `observed_at` lies after the fetch time.
    NegativeElapsed { elapsed: i64 },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            IntegrityIssue::NegativeElapsed { elapsed } => write!(
                f,
                "dropped record {} of {}: negative elapsed ({elapsed}s)",
                self.record_id, self.key
            ),
        }
    }
}

/// Rollup of one entity's sub-records.
///
/// Fields are private so the derived values (`count`, `total_elapsed`,
/// `categories`) always agree with `sub_records`. The only constructor is
/// [`build_aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityAggregate {
    key: EntityKey,
    sub_records: Vec<SubRecord>,
    count: usize,
    total_elapsed: i64,
    categories: BTreeSet<String>,
}

impl EntityAggregate {
    pub const fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn sub_records(&self) -> &[SubRecord] {
        &self.sub_records
    }

    pub const fn count(&self) -> usize {
        self.count
    }

    /// Sum of `elapsed` over all kept sub-records, in seconds.
    pub const fn total_elapsed(&self) -> i64 {
        self.total_elapsed
    }

    /// Distinct categories among the sub-records.
    pub const fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Whether any sub-record has the given category.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

/// Builds the aggregate for one entity.
///
/// Records with a negative `elapsed` are dropped and reported in the returned
/// warnings; everything else is kept in input order.
pub fn build_aggregate(
    key: EntityKey,
    sub_records: Vec<SubRecord>,
) -> (EntityAggregate, Vec<IntegrityWarning>) {
    let mut warnings = Vec::new();
    let mut kept = Vec::with_capacity(sub_records.len());

    for record in sub_records {
        if record.elapsed < 0 {
            tracing::warn!(
                key = %key,
                record_id = record.id,
                elapsed = record.elapsed,
                "dropping record with negative elapsed time"
            );
            warnings.push(IntegrityWarning {
                key: key.clone(),
                record_id: record.id,
                reason: IntegrityIssue::NegativeElapsed {
                    elapsed: record.elapsed,
                },
            });
            continue;
        }
        kept.push(record);
    }

    let total_elapsed = kept
        .iter()
        .fold(0_i64, |total, r| total.saturating_add(r.elapsed));
    let categories = kept.iter().map(|r| r.category.clone()).collect();

    let aggregate = EntityAggregate {
        key,
        count: kept.len(),
        total_elapsed,
        categories,
        sub_records: kept,
    };
    (aggregate, warnings)
}
