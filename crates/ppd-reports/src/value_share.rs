//! How concentrated sale value is, per year and property type.
//!
//! For each cohort the sales are ranked by price, most expensive first, and
//! the report counts how many of them it takes to stay under a share (80% by
//! default) of the cohort's total value. A low percentage means a few
//! expensive sales carry most of the value.

use std::collections::BTreeMap;

use ppd_core::models::{PropertyType, Transaction};
use serde::Serialize;

/// Share of cumulative value used by [`top_value_share`].
pub const DEFAULT_SHARE_PERCENT: u8 = 80;

/// Result for one (year, property type) cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueShare {
    pub year: i32,
    pub property_type: PropertyType,
    /// Number of sales in the cohort.
    pub transactions: usize,
    /// Sales whose inclusive running total stays strictly below the share.
    pub in_top_share: usize,
    /// `100 * in_top_share / transactions`.
    pub percent_in_top_share: f64,
    /// Summed price of the cohort. Wider than a single price so that large
    /// cohorts cannot overflow.
    pub total_value: u128,
}

/// [`top_value_share_at`] with the default 80% share.
pub fn top_value_share(transactions: &[Transaction]) -> Vec<ValueShare> {
    top_value_share_at(transactions, DEFAULT_SHARE_PERCENT)
}

/// Per (year, property type) cohort, the percentage of sales that fall in
/// the most expensive prefix whose running total is below `share_percent`%
/// of the cohort's total value.
///
/// A cohort whose total value is zero has a zero threshold, which no
/// running total is strictly below, so it reports 0%.
///
/// Cohorts are ordered by year, then property type.
pub fn top_value_share_at(transactions: &[Transaction], share_percent: u8) -> Vec<ValueShare> {
    let mut cohorts: BTreeMap<(i32, PropertyType), Vec<u64>> = BTreeMap::new();
    for tx in transactions {
        cohorts
            .entry((tx.year(), tx.property_type))
            .or_default()
            .push(tx.price);
    }

    cohorts
        .into_iter()
        .map(|((year, property_type), mut prices)| {
            prices.sort_unstable_by(|a, b| b.cmp(a));
            let sums = cumulative_sums(&prices);
            let total_value = sums.last().copied().unwrap_or(0);

            // cumsum < total * share / 100, kept in integers.
            let threshold = total_value * u128::from(share_percent);
            let in_top_share = sums.iter().take_while(|&&cum| cum * 100 < threshold).count();

            ValueShare {
                year,
                property_type,
                transactions: prices.len(),
                in_top_share,
                percent_in_top_share: 100.0 * in_top_share as f64 / prices.len() as f64,
                total_value,
            }
        })
        .collect()
}

/// Inclusive running totals of `values`.
///
/// Sums are `u128`: even `u64::MAX` prices need more than 2^64 sales to
/// overflow.
pub fn cumulative_sums(values: &[u64]) -> Vec<u128> {
    values
        .iter()
        .scan(0u128, |acc, &v| {
            *acc += u128::from(v);
            Some(*acc)
        })
        .collect()
}
