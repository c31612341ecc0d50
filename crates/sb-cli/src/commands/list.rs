//! List command for one page of filtered, sorted stakers.

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use sb_core::{EntityAggregate, QuerySpec, ResultPage, SortKey};

use crate::format::{format_address, format_days, join_categories};

#[derive(Debug, Serialize)]
struct JsonPage<'a> {
    category: String,
    min_days: u32,
    sort: SortKey,
    page: usize,
    page_count: usize,
    has_next: bool,
    has_prev: bool,
    stakers: Vec<JsonStaker<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonStaker<'a> {
    address: &'a str,
    categories: &'a BTreeSet<String>,
    count: usize,
    total_elapsed_secs: i64,
}

pub fn run<W: Write>(
    writer: &mut W,
    page: &ResultPage<&EntityAggregate>,
    spec: &QuerySpec,
    json: bool,
) -> Result<()> {
    if json {
        let output = JsonPage {
            category: spec.category.to_string(),
            min_days: spec.min_elapsed_days,
            sort: spec.sort,
            page: page.page_index,
            page_count: page.page_count,
            has_next: page.has_next,
            has_prev: page.has_prev,
            stakers: page
                .items
                .iter()
                .map(|agg| JsonStaker {
                    address: agg.key().as_str(),
                    categories: agg.categories(),
                    count: agg.count(),
                    total_elapsed_secs: agg.total_elapsed(),
                })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(
        writer,
        "STAKERS (category: {}, min days: {}, sort: {})",
        spec.category, spec.min_elapsed_days, spec.sort
    )?;
    writeln!(writer)?;

    if page.items.is_empty() {
        writeln!(writer, "No stakers found with the current filters")?;
    } else {
        writeln!(
            writer,
            "{:<13}  {:<20}  {:>5}  {:>12}",
            "Address", "Categories", "Items", "Duration"
        )?;
        writeln!(
            writer,
            "─────────────  ────────────────────  ─────  ────────────"
        )?;
        for agg in &page.items {
            writeln!(
                writer,
                "{:<13}  {:<20}  {:>5}  {:>12}",
                format_address(agg.key().as_str()),
                join_categories(agg.categories()),
                agg.count(),
                format_days(agg.total_elapsed())
            )?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "Page {} of {}", page.page_index, page.page_count)?;
    Ok(())
}
