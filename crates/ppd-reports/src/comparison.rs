//! Side-by-side comparison of two cohorts across the fixed price buckets.
//!
//! Each cohort is split into the seven [`PriceBucket`]s; every bucket gets a
//! sale count and a median price, and the two cohorts are compared bucket by
//! bucket as percentage changes from the old cohort to the new one.

use ppd_core::buckets::PriceBucket;
use ppd_core::calculations::{median, percentage_differences};
use ppd_core::models::Transaction;
use ppd_core::Result;
use serde::Serialize;
use tracing::debug;

// ── Bucket summaries ──────────────────────────────────────────────────────────

/// Count and median price of one cohort's sales in one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BucketSummary {
    pub count: usize,
    /// `None` when the bucket is empty.
    pub median: Option<f64>,
}

/// One [`BucketSummary`] per bucket, in [`PriceBucket::ALL`] order.
///
/// Empty buckets are present with a zero count and no median.
pub fn summarize_buckets<'a, I>(transactions: I) -> [BucketSummary; PriceBucket::COUNT]
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut prices: [Vec<u64>; PriceBucket::COUNT] = Default::default();
    for tx in transactions {
        prices[PriceBucket::for_price(tx.price).index()].push(tx.price);
    }

    let mut summaries = [BucketSummary::default(); PriceBucket::COUNT];
    for (summary, bucket_prices) in summaries.iter_mut().zip(prices.iter_mut()) {
        summary.count = bucket_prices.len();
        summary.median = median(bucket_prices);
    }
    summaries
}

// ── Comparison ────────────────────────────────────────────────────────────────

/// One bucket of a [`CohortComparison`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketComparison {
    pub bucket: PriceBucket,
    pub label: &'static str,
    pub old: BucketSummary,
    pub new: BucketSummary,
    /// Percentage change in sale count, `0.0` when the old count is zero.
    pub count_pct_diff: f64,
    /// Percentage change in median price, `0.0` when the old median is zero
    /// or undefined.
    pub median_pct_diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortComparison {
    /// Always one row per bucket, in [`PriceBucket::ALL`] order.
    pub rows: Vec<BucketComparison>,
}

/// Compare two cohorts bucket by bucket.
///
/// An empty bucket's undefined median counts as zero in the difference, so
/// a bucket that empties out reports -100% and one that fills up from empty
/// reports 0%.
pub fn compare_cohorts(old: &[Transaction], new: &[Transaction]) -> Result<CohortComparison> {
    let old_summary = summarize_buckets(old);
    let new_summary = summarize_buckets(new);

    let counts = |s: &[BucketSummary]| s.iter().map(|b| b.count as f64).collect::<Vec<_>>();
    let medians = |s: &[BucketSummary]| {
        s.iter()
            .map(|b| b.median.unwrap_or(0.0))
            .collect::<Vec<_>>()
    };

    let count_diffs =
        percentage_differences(&counts(&old_summary[..]), &counts(&new_summary[..]))?;
    let median_diffs =
        percentage_differences(&medians(&old_summary[..]), &medians(&new_summary[..]))?;

    let rows = PriceBucket::ALL
        .iter()
        .enumerate()
        .map(|(i, &bucket)| BucketComparison {
            bucket,
            label: bucket.label(),
            old: old_summary[i],
            new: new_summary[i],
            count_pct_diff: count_diffs[i],
            median_pct_diff: median_diffs[i],
        })
        .collect();

    Ok(CohortComparison { rows })
}

// ── Cohort selection ──────────────────────────────────────────────────────────

/// Selects a cohort out of one transaction collection.
///
/// Every criterion that is set must match; an empty filter selects
/// everything. Town and county compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CohortFilter {
    pub town_city: Option<String>,
    pub county: Option<String>,
    pub year: Option<i32>,
}

impl CohortFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let text_matches = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .map_or(true, |w| w.trim().eq_ignore_ascii_case(actual.trim()))
        };

        text_matches(&self.town_city, &tx.town_city)
            && text_matches(&self.county, &tx.county)
            && self.year.map_or(true, |y| tx.year() == y)
    }

    pub fn select(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect()
    }

    /// Short human description, e.g. `"town BATH, year 2023"`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(town) = &self.town_city {
            parts.push(format!("town {}", town.to_uppercase()));
        }
        if let Some(county) = &self.county {
            parts.push(format!("county {}", county.to_uppercase()));
        }
        if let Some(year) = self.year {
            parts.push(format!("year {}", year));
        }
        if parts.is_empty() {
            "all transactions".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Select both cohorts from `transactions` and compare them.
pub fn compare_filtered(
    transactions: &[Transaction],
    old: &CohortFilter,
    new: &CohortFilter,
) -> Result<CohortComparison> {
    let old_cohort = old.select(transactions);
    let new_cohort = new.select(transactions);
    debug!(
        "Comparing {} ({} sales) with {} ({} sales)",
        old.describe(),
        old_cohort.len(),
        new.describe(),
        new_cohort.len()
    );
    compare_cohorts(&old_cohort, &new_cohort)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppd_core::test_support::{in_county, transaction};

    fn priced(prices: &[u64]) -> Vec<Transaction> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| transaction(&i.to_string(), p, "2023-01-01"))
            .collect()
    }

    // ── summarize_buckets ─────────────────────────────────────────────────────

    #[test]
    fn test_summaries_cover_all_buckets() {
        let txs = priced(&[100_000, 600_000, 600_000, 6_000_000]);
        let summaries = summarize_buckets(&txs);

        assert_eq!(summaries.len(), 7);
        assert_eq!(summaries[0].count, 1);
        assert_eq!(summaries[0].median, Some(100_000.0));
        assert_eq!(summaries[1].count, 0);
        assert_eq!(summaries[1].median, None);
        assert_eq!(summaries[2].count, 2);
        assert_eq!(summaries[6].count, 1);
        let total: usize = summaries.iter().map(|s| s.count).sum();
        assert_eq!(total, txs.len());
    }

    #[test]
    fn test_even_bucket_median_is_mean_of_middle() {
        let txs = priced(&[100_000, 200_000]);
        assert_eq!(summarize_buckets(&txs)[0].median, Some(150_000.0));
    }

    // ── compare_cohorts ───────────────────────────────────────────────────────

    #[test]
    fn test_compare_two_small_cohorts() {
        let old = priced(&[100_000, 600_000, 600_000]);
        let new = priced(&[200_000, 600_000]);

        let cmp = compare_cohorts(&old, &new).unwrap();

        assert_eq!(cmp.rows.len(), 7);

        let first = &cmp.rows[0];
        assert_eq!(first.bucket, PriceBucket::UpTo250k);
        assert_eq!(first.count_pct_diff, 0.0);
        assert_eq!(first.median_pct_diff, 100.0);

        let second = &cmp.rows[1];
        assert_eq!(second.count_pct_diff, 0.0);
        assert_eq!(second.median_pct_diff, 0.0);

        let third = &cmp.rows[2];
        assert_eq!(third.old.count, 2);
        assert_eq!(third.new.count, 1);
        assert_eq!(third.count_pct_diff, -50.0);
        assert_eq!(third.median_pct_diff, 0.0);
    }

    #[test]
    fn test_rows_in_canonical_order_with_labels() {
        let cmp = compare_cohorts(&[], &[]).unwrap();
        let buckets: Vec<PriceBucket> = cmp.rows.iter().map(|r| r.bucket).collect();
        assert_eq!(buckets, PriceBucket::ALL.to_vec());
        assert_eq!(cmp.rows[6].label, PriceBucket::Above5m.label());
        assert!(cmp
            .rows
            .iter()
            .all(|r| r.count_pct_diff == 0.0 && r.median_pct_diff == 0.0));
    }

    #[test]
    fn test_bucket_filling_from_empty_reports_zero() {
        let cmp = compare_cohorts(&[], &priced(&[300_000])).unwrap();
        assert_eq!(cmp.rows[1].count_pct_diff, 0.0);
        assert_eq!(cmp.rows[1].median_pct_diff, 0.0);
    }

    #[test]
    fn test_bucket_emptying_reports_minus_hundred() {
        let cmp = compare_cohorts(&priced(&[300_000]), &[]).unwrap();
        assert_eq!(cmp.rows[1].count_pct_diff, -100.0);
        assert_eq!(cmp.rows[1].median_pct_diff, -100.0);
    }

    // ── CohortFilter ──────────────────────────────────────────────────────────

    #[test]
    fn test_filter_matches_case_insensitively() {
        let tx = transaction("1", 100, "2023-05-01");
        let filter = CohortFilter {
            town_city: Some("bath".to_string()),
            year: Some(2023),
            ..Default::default()
        };
        assert!(filter.matches(&tx));

        let wrong_year = CohortFilter {
            year: Some(2022),
            ..filter.clone()
        };
        assert!(!wrong_year.matches(&tx));
    }

    #[test]
    fn test_empty_filter_selects_everything() {
        let txs = priced(&[1, 2, 3]);
        assert_eq!(CohortFilter::default().select(&txs).len(), 3);
        assert_eq!(CohortFilter::default().describe(), "all transactions");
    }

    #[test]
    fn test_compare_filtered_by_county() {
        let txs = vec![
            in_county(transaction("1", 100_000, "2023-01-01"), "SOMERSET"),
            in_county(transaction("2", 200_000, "2023-01-01"), "BEDFORD"),
        ];
        let old = CohortFilter {
            county: Some("Somerset".to_string()),
            ..Default::default()
        };
        let new = CohortFilter {
            county: Some("Bedford".to_string()),
            ..Default::default()
        };

        let cmp = compare_filtered(&txs, &old, &new).unwrap();
        assert_eq!(cmp.rows[0].old.count, 1);
        assert_eq!(cmp.rows[0].new.count, 1);
        assert_eq!(cmp.rows[0].median_pct_diff, 100.0);
        assert_eq!(old.describe(), "county SOMERSET");
    }
}
