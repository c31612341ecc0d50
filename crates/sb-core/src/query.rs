//! Filter and sort over a loaded aggregate set.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::EntityAggregate;
use crate::types::{Category, SECONDS_PER_DAY};

/// Which categories a query keeps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Keep entities holding at least one item of this category.
    Only(Category),
}

impl CategoryFilter {
    fn matches(&self, aggregate: &EntityAggregate) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => aggregate.has_category(category.as_str()),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = crate::types::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        Category::new(s).map(Self::Only)
    }
}

/// Sort field and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    ElapsedDesc,
    ElapsedAsc,
    CountDesc,
    CountAsc,
}

impl SortKey {
    pub const ALL: [Self; 4] = [
        Self::ElapsedDesc,
        Self::ElapsedAsc,
        Self::CountDesc,
        Self::CountAsc,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ElapsedDesc => "elapsed-desc",
            Self::ElapsedAsc => "elapsed-asc",
            Self::CountDesc => "count-desc",
            Self::CountAsc => "count-asc",
        }
    }

    /// Parses a sort key, falling back to [`SortKey::ElapsedDesc`] when the
    /// input is not recognized.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_else(|err: UnknownSortKey| {
            tracing::debug!(%err, fallback = Self::default().as_str(), "using default sort key");
            Self::default()
        })
    }

    fn compare(self, a: &EntityAggregate, b: &EntityAggregate) -> Ordering {
        match self {
            Self::ElapsedDesc => b.total_elapsed().cmp(&a.total_elapsed()),
            Self::ElapsedAsc => a.total_elapsed().cmp(&b.total_elapsed()),
            Self::CountDesc => b.count().cmp(&a.count()),
            Self::CountAsc => a.count().cmp(&b.count()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elapsed-desc" | "duration-desc" => Ok(Self::ElapsedDesc),
            "elapsed-asc" | "duration-asc" => Ok(Self::ElapsedAsc),
            "count-desc" => Ok(Self::CountDesc),
            "count-asc" => Ok(Self::CountAsc),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

impl Serialize for SortKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse_or_default(&s))
    }
}

/// Error type for unknown sort key strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortKey(String);

impl fmt::Display for UnknownSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort key: {}", self.0)
    }
}

impl std::error::Error for UnknownSortKey {}

/// Caller-supplied filter and sort parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuerySpec {
    pub category: CategoryFilter,

    /// Minimum total staked days; 0 disables the filter.
    pub min_elapsed_days: u32,

    pub sort: SortKey,
}

/// Filters and sorts `aggregates` according to `spec`.
///
/// The result borrows from `aggregates`. Sorting is stable, so entities that
/// compare equal keep their relative input order.
pub fn query<'a>(aggregates: &'a [EntityAggregate], spec: &QuerySpec) -> Vec<&'a EntityAggregate> {
    let min_elapsed = i64::from(spec.min_elapsed_days) * SECONDS_PER_DAY;

    let mut result: Vec<&EntityAggregate> = aggregates
        .iter()
        .filter(|agg| spec.category.matches(agg))
        .filter(|agg| spec.min_elapsed_days == 0 || agg.total_elapsed() >= min_elapsed)
        .collect();

    result.sort_by(|a, b| spec.sort.compare(a, b));
    result
}
