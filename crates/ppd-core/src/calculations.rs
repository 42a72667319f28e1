use crate::error::{PpdError, Result};

// ── Median ────────────────────────────────────────────────────────────────────

/// Median of `values`, sorting the slice in place.
///
/// Even-length input takes the mean of the two middle values. Returns `None`
/// for an empty slice.
pub fn median(values: &mut [u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid] as f64)
    } else {
        Some((values[mid - 1] as f64 + values[mid] as f64) / 2.0)
    }
}

// ── Percentage differences ────────────────────────────────────────────────────

/// Percentage change from `old` to `new`.
///
/// A zero base yields `0.0` whatever `new` is. That is a reporting rule, not
/// a mathematical identity: a change from zero to anything non-zero has no
/// finite percentage.
pub fn percentage_difference(old: f64, new: f64) -> f64 {
    if old == 0.0 {
        0.0
    } else {
        100.0 * (new - old) / old
    }
}

/// Elementwise [`percentage_difference`] over two aligned series.
///
/// Both series must have the same length; a mismatch means the caller
/// aligned them wrongly and is returned as [`PpdError::LengthMismatch`].
pub fn percentage_differences(old: &[f64], new: &[f64]) -> Result<Vec<f64>> {
    if old.len() != new.len() {
        return Err(PpdError::LengthMismatch {
            old: old.len(),
            new: new.len(),
        });
    }
    Ok(old
        .iter()
        .zip(new)
        .map(|(&o, &n)| percentage_difference(o, n))
        .collect())
}
