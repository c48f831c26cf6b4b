//! Dominant-spacing inference for time axes.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};

use crate::frequency::Frequency;

/// Classifies a single spacing between consecutive timestamps.
///
/// Calendar frequencies accept the range of their period lengths: 28..=31
/// days for months, 89..=92 for quarters, 365..=366 for years.
pub fn classify_spacing(delta: TimeDelta) -> Option<Frequency> {
    if delta == TimeDelta::hours(6) {
        return Some(Frequency::SixHourly);
    }
    if delta == TimeDelta::days(1) {
        return Some(Frequency::Daily);
    }
    if delta.num_seconds() % 86_400 != 0 {
        return None;
    }
    match delta.num_days() {
        28..=31 => Some(Frequency::Monthly),
        89..=92 => Some(Frequency::Quarterly),
        365..=366 => Some(Frequency::Yearly),
        _ => None,
    }
}

/// Infers the dominant frequency of a time axis.
///
/// Each consecutive difference is classified with [`classify_spacing`] and
/// the most common frequency wins. Ties between frequencies resolve to the
/// finer one, and a frequency tied with the irregular spacings still wins.
/// Returns `None` for axes shorter than two steps or when irregular spacings
/// outnumber every frequency.
pub fn infer_frequency(times: &[NaiveDateTime]) -> Option<Frequency> {
    if times.len() < 2 {
        return None;
    }

    let mut counts: BTreeMap<Frequency, usize> = BTreeMap::new();
    let mut irregular = 0;
    for pair in times.windows(2) {
        match classify_spacing(pair[1] - pair[0]) {
            Some(freq) => *counts.entry(freq).or_insert(0) += 1,
            None => irregular += 1,
        }
    }

    // Finest first, so only a strictly larger count replaces the leader.
    let mut best: Option<(Frequency, usize)> = None;
    for (freq, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((freq, n));
        }
    }
    best.filter(|&(_, n)| n >= irregular).map(|(freq, _)| freq)
}
