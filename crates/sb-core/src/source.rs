//! The record source boundary.

use async_trait::async_trait;
use thiserror::Error;

use crate::aggregate::SubRecord;
use crate::types::EntityKey;

/// Failure talking to a record source.
///
/// Every variant means the source is unavailable for this load; callers do not
/// retry.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure or timeout.
    #[error("record source unreachable: {0}")]
    Unreachable(String),
    /// The source answered with an error.
    #[error("record source rejected {operation}: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
    /// The source answered with something that could not be decoded.
    #[error("malformed reply to {operation}: {message}")]
    Malformed {
        operation: &'static str,
        message: String,
    },
}

/// Paged access to entities and their staked sub-records.
///
/// Implementations may block on I/O; these calls are the only suspension
/// points of a load.
#[async_trait]
pub trait RecordSource {
    /// Category names known to the ledger.
    async fn list_categories(&self) -> Result<Vec<String>, SourceError>;

    /// Total number of entities.
    async fn count_entities(&self) -> Result<u64, SourceError>;

    /// Keys of page `page` (0-indexed), at most `limit` of them. Pages past
    /// the end are empty.
    async fn list_entity_keys(&self, page: u64, limit: u64) -> Result<Vec<EntityKey>, SourceError>;

    /// Sub-records of one entity, with `elapsed` measured at call time.
    async fn fetch_sub_records(&self, key: &EntityKey) -> Result<Vec<SubRecord>, SourceError>;
}
