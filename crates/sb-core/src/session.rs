//! Query state for one viewer of the aggregate set.
//!
//! A [`Session`] owns the last successfully loaded aggregates together with
//! the current [`QuerySpec`] and page cursor. The pure operations in
//! [`crate::query`] and [`crate::paginate`] do the work; the session only
//! remembers their inputs between calls.

use std::num::{NonZeroU64, NonZeroUsize};
use std::sync::Arc;

use crate::aggregate::{EntityAggregate, IntegrityWarning};
use crate::loader::load_all;
use crate::paginate::{ResultPage, page_count, paginate};
use crate::query::{QuerySpec, query};
use crate::source::{RecordSource, SourceError};
use crate::summary::Summary;

/// Paging sizes used by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Keys requested per record source page.
    pub fetch_page_size: NonZeroU64,
    /// Entities shown per result page.
    pub page_size: NonZeroUsize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fetch_page_size: NonZeroU64::new(10).unwrap_or(NonZeroU64::MIN),
            page_size: NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Counts reported after a successful reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadReport {
    pub entities: usize,
    pub warnings: Vec<IntegrityWarning>,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    categories: Vec<String>,
    aggregates: Arc<[EntityAggregate]>,
    spec: QuerySpec,
    page_index: usize,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            categories: Vec::new(),
            aggregates: Arc::from(Vec::new()),
            spec: QuerySpec::default(),
            page_index: 1,
        }
    }

    /// Reloads categories and aggregates from `source`.
    ///
    /// On success both are replaced at once and the view returns to page 1.
    /// On failure the previous data stays in place.
    pub async fn reload<S>(&mut self, source: &S) -> Result<ReloadReport, SourceError>
    where
        S: RecordSource + ?Sized,
    {
        let categories = source.list_categories().await?;
        let outcome = load_all(source, self.config.fetch_page_size).await?;

        self.categories = categories;
        self.aggregates = Arc::from(outcome.aggregates);
        self.page_index = 1;

        Ok(ReloadReport {
            entities: self.aggregates.len(),
            warnings: outcome.warnings,
        })
    }

    /// Shared handle to the current aggregate set.
    pub fn aggregates(&self) -> Arc<[EntityAggregate]> {
        Arc::clone(&self.aggregates)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub const fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub const fn page_index(&self) -> usize {
        self.page_index
    }

    /// Replaces the query and returns to the first page.
    pub fn apply(&mut self, spec: QuerySpec) {
        self.spec = spec;
        self.page_index = 1;
    }

    /// Jumps to `page_index`, clamped to the available pages.
    pub fn go_to(&mut self, page_index: usize) {
        self.page_index = page_index.clamp(1, self.page_count());
    }

    /// Advances one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.page_index < self.page_count() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Goes back one page. Returns `false` on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.page_index > 1 {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    /// Filtered and sorted view under the current query.
    pub fn results(&self) -> Vec<&EntityAggregate> {
        query(&self.aggregates, &self.spec)
    }

    /// The current page of results.
    pub fn current_page(&self) -> ResultPage<&EntityAggregate> {
        paginate(&self.results(), self.page_index, self.config.page_size)
    }

    /// Totals over the full, unfiltered set.
    pub fn summary(&self) -> Summary {
        Summary::of(&self.aggregates)
    }

    fn page_count(&self) -> usize {
        page_count(self.results().len(), self.config.page_size)
    }
}
