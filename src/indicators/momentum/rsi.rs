//! RSI (Relative Strength Index) indicator

use crate::models::indicators::RsiIndicator;
use crate::models::price::PriceBar;

/// RSI from Wilder-smoothed average gain and loss.
///
/// Both zero (a flat market) reads as the neutral 50; zero loss with some gain
/// saturates at 100.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// RSI for every bar, aligned with `closes`.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// Averages are seeded with the mean of the first `period` changes and then
/// smoothed with alpha = 1 / period, so the first defined value sits at index
/// `period`. Series with `period` or fewer closes are entirely undefined.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let p = period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        avg_gain += change.max(0.0);
        avg_loss += (-change).max(0.0);
    }
    avg_gain /= p;
    avg_loss /= p;
    out[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    for i in period + 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        avg_gain = (avg_gain * (p - 1.0) + change.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-change).max(0.0)) / p;
        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }
    out
}

/// Latest RSI of a bar sequence.
pub fn calculate_rsi(bars: &[PriceBar], period: u32) -> Option<RsiIndicator> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let value = rsi_series(&closes, period as usize).last().copied().flatten()?;
    Some(RsiIndicator {
        value,
        period: Some(period),
    })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(bars: &[PriceBar]) -> Option<RsiIndicator> {
    calculate_rsi(bars, 14)
}
