//! Volume and price-trend helpers used by the evaluator.

use crate::common::math;

/// Trailing average volume over `window` bars, the latest bar included.
pub fn volume_average_series(volumes: &[f64], window: usize) -> Vec<Option<f64>> {
    math::sma_series(volumes, window)
}

/// Latest volume relative to its trailing average; 1 when the average is
/// zero or undefined.
pub fn volume_ratio(latest_volume: f64, average: Option<f64>) -> f64 {
    match average {
        Some(avg) if avg > 0.0 => latest_volume / avg,
        _ => 1.0,
    }
}

/// Close-to-close change over the last `window` bars, or over the whole
/// series when it is shorter.
pub fn trailing_return(closes: &[f64], window: usize) -> Option<f64> {
    if closes.len() < 2 || window == 0 {
        return None;
    }
    let last = closes.len() - 1;
    let start = last - window.min(last);
    math::pct_change(closes[start], closes[last])
}
