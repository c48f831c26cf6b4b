//! NaN-skipping reductions for gridded model output.
//!
//! Masked grid cells carry NaN. Every function here ignores NaN (and
//! infinite) inputs and returns NaN when no finite value remains, so a
//! fully masked cell stays masked after reduction.

/// Sum of the finite values. NaN if there are none.
pub fn nan_sum(data: &[f64]) -> f64 {
    let mut n = 0usize;
    let mut sum = 0.0;
    for &x in data.iter().filter(|x| x.is_finite()) {
        sum += x;
        n += 1;
    }
    if n == 0 { f64::NAN } else { sum }
}

/// Arithmetic mean of the finite values. NaN if there are none.
pub fn nan_mean(data: &[f64]) -> f64 {
    let mut n = 0usize;
    let mut sum = 0.0;
    for &x in data.iter().filter(|x| x.is_finite()) {
        sum += x;
        n += 1;
    }
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Largest finite value. NaN if there are none.
pub fn nan_max(data: &[f64]) -> f64 {
    data.iter()
        .copied()
        .filter(|x| x.is_finite())
        .reduce(f64::max)
        .unwrap_or(f64::NAN)
}

/// Smallest finite value. NaN if there are none.
pub fn nan_min(data: &[f64]) -> f64 {
    data.iter()
        .copied()
        .filter(|x| x.is_finite())
        .reduce(f64::min)
        .unwrap_or(f64::NAN)
}

/// Median of the finite values. For an even count, averages the middle two.
/// NaN if there are none.
pub fn nan_median(data: &[f64]) -> f64 {
    let mut finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.sort_by(f64::total_cmp);
    median(&finite)
}

/// Median of pre-sorted data. For even length, averages the middle two values.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn median(sorted: &[f64]) -> f64 {
    assert!(!sorted.is_empty(), "median: input must not be empty");
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
