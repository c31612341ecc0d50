//! Full aggregation from a record source.
//!
//! # Algorithm Summary
//!
//! 1. Ask the source for the total entity count
//! 2. Walk `ceil(total / fetch_page_size)` key pages, one at a time
//! 3. For each key, fetch its sub-records and build the aggregate
//!
//! Every call is awaited before the next one is issued. Any source error
//! aborts the load and nothing is returned.

use std::num::NonZeroU64;

use crate::aggregate::{EntityAggregate, IntegrityWarning, build_aggregate};
use crate::source::{RecordSource, SourceError};

/// Result of a successful full load.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// Aggregates in source enumeration order.
    pub aggregates: Vec<EntityAggregate>,

    /// Sub-records dropped while aggregating.
    pub warnings: Vec<IntegrityWarning>,
}

/// Fetches every entity from `source` and builds its aggregate.
pub async fn load_all<S>(source: &S, fetch_page_size: NonZeroU64) -> Result<LoadOutcome, SourceError>
where
    S: RecordSource + ?Sized,
{
    let total = source.count_entities().await?;
    let limit = fetch_page_size.get();
    let pages = total.div_ceil(limit);
    tracing::info!(total, pages, page_size = limit, "loading entities");

    let mut outcome = LoadOutcome::default();
    for page in 0..pages {
        let keys = source.list_entity_keys(page, limit).await?;
        tracing::debug!(page, keys = keys.len(), "fetched key page");

        for key in keys {
            let records = source.fetch_sub_records(&key).await?;
            let (aggregate, warnings) = build_aggregate(key, records);
            outcome.aggregates.push(aggregate);
            outcome.warnings.extend(warnings);
        }
    }

    tracing::info!(
        entities = outcome.aggregates.len(),
        dropped = outcome.warnings.len(),
        "load complete"
    );
    Ok(outcome)
}
