//! Fixed price ranges used to compare cohorts.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Bucket boundaries ─────────────────────────────────────────────────────────

/// Inclusive upper bound of every bucket except the last, in pounds.
const UPPER_BOUNDS: [u64; 6] = [
    250_000, 500_000, 750_000, 1_000_000, 2_000_000, 5_000_000,
];

// ── PriceBucket ───────────────────────────────────────────────────────────────

/// One of seven contiguous price ranges, right-inclusive.
///
/// The first bucket also holds a price of exactly zero, so together the
/// buckets cover every non-negative price with no gaps or overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceBucket {
    UpTo250k,
    UpTo500k,
    UpTo750k,
    UpTo1m,
    UpTo2m,
    UpTo5m,
    Above5m,
}

impl PriceBucket {
    /// All buckets in canonical (ascending price) order.
    pub const ALL: [PriceBucket; 7] = [
        PriceBucket::UpTo250k,
        PriceBucket::UpTo500k,
        PriceBucket::UpTo750k,
        PriceBucket::UpTo1m,
        PriceBucket::UpTo2m,
        PriceBucket::UpTo5m,
        PriceBucket::Above5m,
    ];

    /// Number of buckets.
    pub const COUNT: usize = Self::ALL.len();

    /// The bucket `price` falls into.
    pub fn for_price(price: u64) -> Self {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.contains(price))
            .unwrap_or(PriceBucket::Above5m)
    }

    /// Position of this bucket in [`PriceBucket::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Exclusive lower bound (`None` for the first bucket, which starts at 0
    /// inclusive).
    pub fn lower_bound(&self) -> Option<u64> {
        match self.index() {
            0 => None,
            i => Some(UPPER_BOUNDS[i - 1]),
        }
    }

    /// Inclusive upper bound (`None` for the open-ended top bucket).
    pub fn upper_bound(&self) -> Option<u64> {
        UPPER_BOUNDS.get(self.index()).copied()
    }

    /// Display label, e.g. `"£250,000 < x <= £500,000"`.
    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::UpTo250k => "£0 < x <= £250,000",
            PriceBucket::UpTo500k => "£250,000 < x <= £500,000",
            PriceBucket::UpTo750k => "£500,000 < x <= £750,000",
            PriceBucket::UpTo1m => "£750,000 < x <= £1,000,000",
            PriceBucket::UpTo2m => "£1,000,000 < x <= £2,000,000",
            PriceBucket::UpTo5m => "£2,000,000 < x <= £5,000,000",
            PriceBucket::Above5m => "£5,000,000+",
        }
    }

    /// Whether `price` lies inside this bucket.
    pub fn contains(&self, price: u64) -> bool {
        let above_lower = self.lower_bound().map_or(true, |lo| price > lo);
        let below_upper = self.upper_bound().map_or(true, |hi| price <= hi);
        above_lower && below_upper
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_right_inclusive() {
        assert_eq!(PriceBucket::for_price(0), PriceBucket::UpTo250k);
        assert_eq!(PriceBucket::for_price(250_000), PriceBucket::UpTo250k);
        assert_eq!(PriceBucket::for_price(250_001), PriceBucket::UpTo500k);
        assert_eq!(PriceBucket::for_price(1_000_000), PriceBucket::UpTo1m);
        assert_eq!(PriceBucket::for_price(5_000_000), PriceBucket::UpTo5m);
        assert_eq!(PriceBucket::for_price(5_000_001), PriceBucket::Above5m);
        assert_eq!(PriceBucket::for_price(u64::MAX), PriceBucket::Above5m);
    }

    #[test]
    fn test_every_price_in_exactly_one_bucket() {
        let mut prices = vec![0, 1, u64::MAX];
        for &b in &UPPER_BOUNDS {
            prices.extend([b - 1, b, b + 1]);
        }
        for price in prices {
            let matching: Vec<_> = PriceBucket::ALL
                .iter()
                .filter(|b| b.contains(price))
                .collect();
            assert_eq!(matching.len(), 1, "price {price} matched {matching:?}");
            assert_eq!(*matching[0], PriceBucket::for_price(price));
        }
    }

    #[test]
    fn test_buckets_are_contiguous() {
        for pair in PriceBucket::ALL.windows(2) {
            assert_eq!(pair[0].upper_bound(), pair[1].lower_bound());
        }
        assert_eq!(PriceBucket::ALL[0].lower_bound(), None);
        assert_eq!(PriceBucket::Above5m.upper_bound(), None);
    }

    #[test]
    fn test_index_matches_canonical_order() {
        for (i, bucket) in PriceBucket::ALL.iter().enumerate() {
            assert_eq!(bucket.index(), i);
        }
        assert_eq!(PriceBucket::COUNT, 7);
    }

    #[test]
    fn test_labels() {
        assert_eq!(PriceBucket::UpTo250k.label(), "£0 < x <= £250,000");
        assert_eq!(PriceBucket::Above5m.to_string(), "£5,000,000+");
    }
}
