//! Postcode districts with the highest total sale value in each quarter.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use ppd_core::models::Transaction;
use ppd_core::time_utils::Quarter;
use serde::Serialize;
use tracing::debug;

/// Districts kept per quarter unless the caller asks otherwise.
pub const DEFAULT_TOP_N: usize = 5;

/// One ranked (quarter, district) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterlyDistrictTotal {
    pub quarter: Quarter,
    /// `quarter` rendered as `"Q<q> <yyyy>"`.
    pub period: String,
    /// Postcode outward code, e.g. `"BA1"`.
    pub district: String,
    /// 1-based rank within the quarter.
    pub rank: usize,
    /// Summed price of the district's sales in the quarter.
    pub total_price: u128,
    pub transactions: usize,
}

#[derive(Default)]
struct DistrictTotal {
    total_price: u128,
    transactions: usize,
}

/// For each quarter, the `n` postcode districts with the largest summed
/// sale price.
///
/// The district is always taken from the postcode's outward code; the
/// published `district` column (a local authority name) is ignored.
/// Transactions without a postcode are skipped.
///
/// Quarters are returned most recent first, each quarter's rows contiguous
/// and ordered by total descending. Equal totals are ordered by district
/// name so the cut-off at `n` is deterministic.
pub fn top_districts_by_quarter(
    transactions: &[Transaction],
    n: usize,
) -> Vec<QuarterlyDistrictTotal> {
    let mut by_quarter: BTreeMap<Quarter, HashMap<&str, DistrictTotal>> = BTreeMap::new();
    let mut skipped = 0usize;

    for tx in transactions {
        let Some(district) = tx.postcode_district() else {
            skipped += 1;
            continue;
        };
        let total = by_quarter
            .entry(tx.quarter())
            .or_default()
            .entry(district)
            .or_default();
        total.total_price += u128::from(tx.price);
        total.transactions += 1;
    }

    if skipped > 0 {
        debug!("Skipped {} transactions without a postcode", skipped);
    }

    let mut rows = Vec::new();
    for (quarter, districts) in by_quarter.into_iter().rev() {
        let mut ranked: Vec<(&str, DistrictTotal)> = districts.into_iter().collect();
        ranked.sort_by_key(|(district, total)| (Reverse(total.total_price), *district));

        let period = quarter.label();
        rows.extend(
            ranked
                .into_iter()
                .take(n)
                .enumerate()
                .map(|(i, (district, total))| QuarterlyDistrictTotal {
                    quarter,
                    period: period.clone(),
                    district: district.to_string(),
                    rank: i + 1,
                    total_price: total.total_price,
                    transactions: total.transactions,
                }),
        );
    }
    rows
}
