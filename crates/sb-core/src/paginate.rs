//! Fixed-size pages over an ordered result set.

use std::num::NonZeroUsize;

use serde::Serialize;

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page_index: usize,
    /// Never zero; an empty result set is a single empty page.
    pub page_count: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Number of pages needed for `len` items.
pub fn page_count(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Slices `ordered` into the page at `page_index`.
///
/// `page_index` is 1-based and clamped into `1..=page_count`.
pub fn paginate<T: Clone>(ordered: &[T], page_index: usize, page_size: NonZeroUsize) -> ResultPage<T> {
    let page_count = page_count(ordered.len(), page_size);
    let page_index = page_index.clamp(1, page_count);

    let start = (page_index - 1) * page_size.get();
    let end = (start + page_size.get()).min(ordered.len());
    let items = ordered.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    ResultPage {
        items,
        page_index,
        page_count,
        has_next: page_index < page_count,
        has_prev: page_index > 1,
    }
}
