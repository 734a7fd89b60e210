use crate::core::{RankedResultSet, Record};
use std::cmp::Reverse;

/// Stable sort by `available_capacity`, highest first. Ties keep input order.
pub fn rank(mut records: Vec<Record>) -> RankedResultSet {
    records.sort_by_key(|r| Reverse(r.available_capacity));
    RankedResultSet::from_sorted(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(center: &str, capacity: u64) -> Record {
        Record {
            center_name: Some(center.to_string()),
            available_capacity: capacity,
            age_range: Some("18".to_string()),
            price_tier: Some("Free".to_string()),
            vaccine_name: None,
            date: None,
            pointer: String::new(),
        }
    }

    fn names(ranked: &[Record]) -> Vec<&str> {
        ranked
            .iter()
            .map(|r| r.center_name.as_deref().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_rank_sorts_descending() {
        let ranked = rank(vec![record("a", 3), record("b", 10), record("c", 7)]);
        let capacities: Vec<u64> = ranked.records().iter().map(|r| r.available_capacity).collect();
        assert_eq!(capacities, vec![10, 7, 3]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let ranked = rank(vec![
            record("first", 5),
            record("big", 9),
            record("second", 5),
            record("third", 5),
        ]);
        assert_eq!(names(ranked.records()), vec!["big", "first", "second", "third"]);
    }

    #[test]
    fn test_rank_empty_input() {
        let ranked = rank(Vec::new());
        assert!(ranked.is_empty());
        assert!(ranked.top(3).is_empty());
    }

    #[test]
    fn test_top_three_of_eight() {
        let capacities = [4, 19, 1, 8, 25, 2, 19, 6];
        let records = capacities
            .iter()
            .enumerate()
            .map(|(i, c)| record(&format!("c{}", i), *c))
            .collect();

        let ranked = rank(records);
        let top = ranked.top(3);

        assert_eq!(top.len(), 3);
        assert_eq!(names(top), vec!["c4", "c1", "c6"]);
        assert_eq!(
            top.iter().map(|r| r.available_capacity).collect::<Vec<_>>(),
            vec![25, 19, 19]
        );
    }

    #[test]
    fn test_top_larger_than_set() {
        let ranked = rank(vec![record("only", 1)]);
        assert_eq!(ranked.top(3).len(), 1);
    }
}
