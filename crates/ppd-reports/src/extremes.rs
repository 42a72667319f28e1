//! Most expensive sale per group.

use std::collections::BTreeMap;

use ppd_core::models::Transaction;
use serde::Serialize;

/// The most expensive sale recorded in one county.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountyExtreme {
    pub county: String,
    pub transaction: Transaction,
}

/// Most expensive sale in each county, ordered by county name.
pub fn most_expensive_by_county(transactions: &[Transaction]) -> Vec<CountyExtreme> {
    most_expensive_by(transactions, |tx| tx.county.clone())
        .into_iter()
        .map(|(county, tx)| CountyExtreme {
            county,
            transaction: tx.clone(),
        })
        .collect()
}

/// The highest-priced transaction for every distinct `key_fn` value,
/// ordered by key.
///
/// When several transactions share a group's maximum price, the one that
/// comes first in `transactions` is kept.
pub fn most_expensive_by<'a, K, F>(
    transactions: &'a [Transaction],
    key_fn: F,
) -> Vec<(K, &'a Transaction)>
where
    K: Ord,
    F: Fn(&Transaction) -> K,
{
    let mut best: BTreeMap<K, &'a Transaction> = BTreeMap::new();
    for tx in transactions {
        best.entry(key_fn(tx))
            .and_modify(|current| {
                if tx.price > current.price {
                    *current = tx;
                }
            })
            .or_insert(tx);
    }
    best.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppd_core::test_support::{in_county, transaction};

    #[test]
    fn test_one_row_per_county_with_max_price() {
        let txs = vec![
            in_county(transaction("1", 300_000, "2023-01-01"), "SOMERSET"),
            in_county(transaction("2", 950_000, "2023-02-01"), "BEDFORD"),
            in_county(transaction("3", 700_000, "2023-03-01"), "SOMERSET"),
            in_county(transaction("4", 120_000, "2023-04-01"), "BEDFORD"),
        ];

        let result = most_expensive_by_county(&txs);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].county, "BEDFORD");
        assert_eq!(result[0].transaction.uid, "2");
        assert_eq!(result[1].county, "SOMERSET");
        assert_eq!(result[1].transaction.uid, "3");
    }

    #[test]
    fn test_tie_keeps_first_encountered() {
        let txs = vec![
            in_county(transaction("first", 500_000, "2023-01-01"), "KENT"),
            in_county(transaction("second", 500_000, "2023-06-01"), "KENT"),
        ];

        let result = most_expensive_by_county(&txs);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].transaction.uid, "first");
    }

    #[test]
    fn test_single_member_group_returned_unchanged() {
        let tx = in_county(transaction("solo", 1, "2020-01-01"), "RUTLAND");
        let result = most_expensive_by_county(std::slice::from_ref(&tx));
        assert_eq!(result[0].transaction, tx);
    }

    #[test]
    fn test_empty_input() {
        assert!(most_expensive_by_county(&[]).is_empty());
    }

    #[test]
    fn test_generic_key() {
        let txs = vec![
            transaction("a", 100, "2021-05-01"),
            transaction("b", 300, "2021-07-01"),
            transaction("c", 200, "2022-01-01"),
        ];
        let by_year = most_expensive_by(&txs, |tx| tx.year());
        let picked: Vec<(i32, &str)> = by_year
            .iter()
            .map(|(year, tx)| (*year, tx.uid.as_str()))
            .collect();
        assert_eq!(picked, vec![(2021, "b"), (2022, "c")]);
    }
}
