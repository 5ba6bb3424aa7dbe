//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::indicators::{EmaIndicator, EmaWarmup};
use crate::models::price::PriceBar;

/// EMA of every close, smoothing factor 2 / (period + 1), seeded from the
/// first close.
pub fn ema_series(closes: &[f64], period: usize, warmup: EmaWarmup) -> Vec<Option<f64>> {
    let input: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    math::ema_series(&input, period, warmup)
}

/// Calculate EMA for a specific period
pub fn calculate_ema(bars: &[PriceBar], period: u32) -> Option<EmaIndicator> {
    calculate_ema_with(bars, period, EmaWarmup::Strict)
}

pub fn calculate_ema_with(bars: &[PriceBar], period: u32, warmup: EmaWarmup) -> Option<EmaIndicator> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let value = ema_series(&closes, period as usize, warmup)
        .last()
        .copied()
        .flatten()?;

    Some(EmaIndicator { value, period })
}

/// Calculate multiple EMAs at once
pub fn calculate_emas(bars: &[PriceBar], periods: &[u32]) -> Vec<EmaIndicator> {
    periods
        .iter()
        .filter_map(|&period| calculate_ema(bars, period))
        .collect()
}

/// Relative position of a fast and a slow EMA: 1 above, -1 below, 0 equal.
pub fn check_ema_cross(bars: &[PriceBar], fast_period: u32, slow_period: u32) -> Option<i32> {
    let fast_ema = calculate_ema(bars, fast_period)?;
    let slow_ema = calculate_ema(bars, slow_period)?;

    if fast_ema.value > slow_ema.value {
        Some(1)
    } else if fast_ema.value < slow_ema.value {
        Some(-1)
    } else {
        Some(0)
    }
}
