//! End-to-end tests for the load -> query -> paginate pipeline.

use std::num::{NonZeroU64, NonZeroUsize};

use async_trait::async_trait;

use sb_core::{
    EntityAggregate, EntityKey, QuerySpec, RecordSource, SECONDS_PER_DAY, SortKey, SourceError,
    SubRecord, build_aggregate, load_all, paginate, query,
};

fn aggregate(key: &str, category: &str, count: u64, days_each: i64) -> EntityAggregate {
    let records = (0..count)
        .map(|id| SubRecord {
            id,
            category: category.to_string(),
            observed_at: 0,
            elapsed: days_each * SECONDS_PER_DAY,
        })
        .collect();
    build_aggregate(EntityKey::new(key).unwrap(), records).0
}

fn spec(category: &str) -> QuerySpec {
    QuerySpec {
        category: category.parse().unwrap(),
        min_elapsed_days: 0,
        sort: SortKey::ElapsedDesc,
    }
}

#[test]
fn worked_example_from_the_dashboard() {
    // A: 3 warriors, 3 days total. B: 1 mage, 1 day.
    let a = aggregate("x", "Warrior", 3, 1);
    let b = aggregate("y", "Mage", 1, 1);
    assert_eq!(a.total_elapsed(), 259_200);
    assert_eq!(b.total_elapsed(), 86_400);

    let input = vec![a.clone(), b.clone()];

    let all = query(&input, &spec("all"));
    assert_eq!(all, vec![&a, &b]);

    let mages = query(&input, &spec("Mage"));
    assert_eq!(mages, vec![&b]);

    let page = paginate(&all, 1, NonZeroUsize::new(1).unwrap());
    assert_eq!(page.items, vec![&a]);
    assert_eq!(page.page_index, 1);
    assert_eq!(page.page_count, 2);
    assert!(page.has_next);
    assert!(!page.has_prev);
}

/// Ledger with `n` entities, entity `i` holding `i` items staked `i` days each.
struct Ladder {
    n: u64,
    now: i64,
}

#[async_trait]
impl RecordSource for Ladder {
    async fn list_categories(&self) -> Result<Vec<String>, SourceError> {
        Ok(vec!["Even".to_string(), "Odd".to_string()])
    }

    async fn count_entities(&self) -> Result<u64, SourceError> {
        Ok(self.n)
    }

    async fn list_entity_keys(&self, page: u64, limit: u64) -> Result<Vec<EntityKey>, SourceError> {
        let start = page * limit;
        let end = (start + limit).min(self.n);
        Ok((start..end)
            .map(|i| EntityKey::new(format!("0x{i:02}")).unwrap())
            .collect())
    }

    async fn fetch_sub_records(&self, key: &EntityKey) -> Result<Vec<SubRecord>, SourceError> {
        let i: i64 = key.as_str()[2..]
            .parse()
            .map_err(|_| SourceError::Malformed {
                operation: "fetch_sub_records",
                message: key.to_string(),
            })?;
        let category = if i % 2 == 0 { "Even" } else { "Odd" };
        Ok((0..i)
            .map(|id| {
                SubRecord::observed(
                    id.unsigned_abs(),
                    category,
                    self.now - i * SECONDS_PER_DAY,
                    self.now,
                )
            })
            .collect())
    }
}

#[tokio::test]
async fn loaded_ladder_filters_sorts_and_pages() {
    let source = Ladder {
        n: 7,
        now: 1_750_000_000,
    };
    let outcome = load_all(&source, NonZeroU64::new(3).unwrap()).await.unwrap();
    assert_eq!(outcome.aggregates.len(), 7);

    let odd_long = QuerySpec {
        category: "Odd".parse().unwrap(),
        min_elapsed_days: 9,
        sort: SortKey::CountAsc,
    };
    // Odd entities: 1 (1 day total), 3 (9 days), 5 (25 days).
    let result = query(&outcome.aggregates, &odd_long);
    let keys: Vec<_> = result.iter().map(|a| a.key().as_str()).collect();
    assert_eq!(keys, vec!["0x03", "0x05"]);

    let page = paginate(&result, 2, NonZeroUsize::new(1).unwrap());
    assert_eq!(page.items[0].key().as_str(), "0x05");
    assert!(!page.has_next);
    assert!(page.has_prev);
}
