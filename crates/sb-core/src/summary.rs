//! Summary statistics over a loaded aggregate set.

use serde::Serialize;

use crate::aggregate::EntityAggregate;
use crate::types::SECONDS_PER_DAY;

/// Dashboard totals for one aggregate set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub unique_entities: usize,
    pub total_records: usize,
    /// Average days staked per record, one decimal place.
    pub average_elapsed_days: f64,
    /// Average days staked per record, whole days.
    pub average_elapsed_whole_days: u64,
}

impl Summary {
    pub fn of(aggregates: &[EntityAggregate]) -> Self {
        Self {
            unique_entities: aggregates.len(),
            total_records: aggregates.iter().map(EntityAggregate::count).sum(),
            average_elapsed_days: average_elapsed_days(aggregates),
            average_elapsed_whole_days: average_elapsed_whole_days(aggregates),
        }
    }
}

/// Mean elapsed days per record, or `None` when there are no records.
#[allow(clippy::cast_precision_loss)]
fn mean_days(aggregates: &[EntityAggregate]) -> Option<f64> {
    let (count, elapsed) = aggregates
        .iter()
        .fold((0_usize, 0_i128), |(count, elapsed), agg| {
            (count + agg.count(), elapsed + i128::from(agg.total_elapsed()))
        });
    if count == 0 {
        return None;
    }
    Some(elapsed as f64 / count as f64 / SECONDS_PER_DAY as f64)
}

/// Average elapsed days per record, rounded to one decimal place.
///
/// Returns 0 when the set holds no records.
pub fn average_elapsed_days(aggregates: &[EntityAggregate]) -> f64 {
    mean_days(aggregates).map_or(0.0, |days| (days * 10.0).round() / 10.0)
}

/// Average elapsed days per record, rounded to whole days.
///
/// Returns 0 when the set holds no records.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn average_elapsed_whole_days(aggregates: &[EntityAggregate]) -> u64 {
    mean_days(aggregates).map_or(0, |days| days.round().max(0.0) as u64)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::aggregate::{SubRecord, build_aggregate};
    use crate::types::EntityKey;

    fn entity(key: &str, elapsed: &[i64]) -> EntityAggregate {
        let records = elapsed
            .iter()
            .zip(0_u64..)
            .map(|(elapsed, id)| SubRecord {
                id,
                category: "Warrior".to_string(),
                observed_at: 0,
                elapsed: *elapsed,
            })
            .collect();
        build_aggregate(EntityKey::new(key).unwrap(), records).0
    }

    #[test]
    fn empty_set_averages_to_zero() {
        assert_eq!(average_elapsed_days(&[]), 0.0);
        assert_eq!(average_elapsed_whole_days(&[]), 0);
    }

    #[test]
    fn entities_without_records_average_to_zero() {
        let aggs = vec![entity("a", &[]), entity("b", &[])];
        assert_eq!(average_elapsed_days(&aggs), 0.0);
        assert_eq!(average_elapsed_whole_days(&aggs), 0);
    }

    #[test]
    fn average_is_per_record_not_per_entity() {
        // 4 records totalling 4 days across two entities.
        let aggs = vec![
            entity("a", &[3 * SECONDS_PER_DAY / 2; 2]),
            entity("b", &[SECONDS_PER_DAY / 2; 2]),
        ];
        assert_eq!(average_elapsed_days(&aggs), 1.0);
    }

    #[test]
    fn granularities_round_independently() {
        // 2.26 days average.
        let aggs = vec![entity("a", &[195_264])];
        assert_eq!(average_elapsed_days(&aggs), 2.3);
        assert_eq!(average_elapsed_whole_days(&aggs), 2);

        // 2.5 days rounds up to 3 whole days.
        let aggs = vec![entity("a", &[216_000])];
        assert_eq!(average_elapsed_days(&aggs), 2.5);
        assert_eq!(average_elapsed_whole_days(&aggs), 3);
    }

    #[test]
    fn summary_collects_totals() {
        let aggs = vec![
            entity("a", &[SECONDS_PER_DAY, SECONDS_PER_DAY, SECONDS_PER_DAY]),
            entity("b", &[SECONDS_PER_DAY]),
        ];
        let summary = Summary::of(&aggs);
        assert_eq!(summary.unique_entities, 2);
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.average_elapsed_days, 1.0);
        assert_eq!(summary.average_elapsed_whole_days, 1);
    }

    #[test]
    fn average_of_saturated_totals_is_finite() {
        let aggregates = vec![entity("a", &[i64::MAX]), entity("b", &[i64::MAX])];
        let days = average_elapsed_days(&aggregates);
        assert!(days.is_finite());
        assert!(days > 1e14);
        assert!(average_elapsed_whole_days(&aggregates) > 0);
    }

}
