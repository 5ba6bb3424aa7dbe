//! Scalar and rolling-window statistics over price columns.

use crate::models::indicators::EmaWarmup;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Simple moving average of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    mean(&values[values.len() - period..])
}

/// Sample (n - 1) standard deviation. A single value has zero spread.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    if values.len() < 2 {
        return Some(0.0);
    }
    let sum_sq: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Smoothing factor of a span-`period` EMA.
pub fn ema_alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    let alpha = ema_alpha(period);
    alpha * value + (1.0 - alpha) * previous
}

/// Trailing simple moving average, undefined until `period` values exist.
pub fn sma_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    let mut window_sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        window_sum += value;
        if i >= period {
            window_sum -= values[i - period];
        }
        if i + 1 >= period {
            out.push(Some(window_sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Trailing sample standard deviation over the same windows as [`sma_series`].
pub fn rolling_std_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                sample_std_dev(&values[i + 1 - period..=i])
            }
        })
        .collect()
}

/// Exponential moving average seeded from the first defined value.
///
/// Leading `None`s are skipped; a `None` after the seed yields `None` at that
/// position without disturbing the recursion.
pub fn ema_series(values: &[Option<f64>], period: usize, warmup: EmaWarmup) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let observations = values.iter().filter(|v| v.is_some()).count();
    let (effective_period, required) = match warmup {
        EmaWarmup::Strict => (period, period),
        EmaWarmup::ShrinkToFit => (period.min(observations.max(1)), 1),
    };
    let alpha = ema_alpha(effective_period);

    let mut state: Option<f64> = None;
    let mut seen = 0usize;
    for (i, value) in values.iter().enumerate() {
        let Some(x) = *value else { continue };
        let next = match state {
            None => x,
            Some(prev) => alpha * x + (1.0 - alpha) * prev,
        };
        state = Some(next);
        seen += 1;
        if seen >= required {
            out[i] = Some(next);
        }
    }
    out
}

/// Fractional change from `from` to `to`; undefined for a zero base.
pub fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 || !from.is_finite() || !to.is_finite() {
        return None;
    }
    Some((to - from) / from)
}
