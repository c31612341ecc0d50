//! Core domain logic for the staking dashboard.
//!
//! This crate contains:
//! - Aggregation: rolling staked sub-records up into per-entity aggregates
//! - Loading: sequential, all-or-nothing fetch from a [`RecordSource`]
//! - Querying: category/duration filters and stable sorting
//! - Pagination and summary statistics
//! - [`Session`]: the query state a viewer carries between calls

mod aggregate;
mod loader;
pub mod paginate;
pub mod query;
mod session;
mod source;
pub mod summary;
pub mod types;

pub use aggregate::{EntityAggregate, IntegrityIssue, IntegrityWarning, SubRecord, build_aggregate};
pub use loader::{LoadOutcome, load_all};
pub use paginate::{ResultPage, paginate};
pub use query::{CategoryFilter, QuerySpec, SortKey, UnknownSortKey, query};
pub use session::{ReloadReport, Session, SessionConfig};
pub use source::{RecordSource, SourceError};
pub use summary::{Summary, average_elapsed_days, average_elapsed_whole_days};
pub use types::{Category, EntityKey, SECONDS_PER_DAY, ValidationError};
