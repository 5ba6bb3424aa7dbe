//! Bollinger Bands indicator

use crate::common::math;
use crate::models::indicators::BollingerBandsIndicator;
use crate::models::price::PriceBar;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerSeries {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * sample standard deviation)
/// Lower Band = Middle - (std_dev * sample standard deviation)
pub fn bollinger_series(closes: &[f64], period: usize, std_dev: f64) -> BollingerSeries {
    let middle = math::sma_series(closes, period);
    let spread: Vec<Option<f64>> = math::rolling_std_series(closes, period)
        .into_iter()
        .map(|s| s.map(|s| s * std_dev))
        .collect();

    let upper = middle
        .iter()
        .zip(&spread)
        .map(|(m, s)| Some((*m)? + (*s)?))
        .collect();
    let lower = middle
        .iter()
        .zip(&spread)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    BollingerSeries {
        middle,
        upper,
        lower,
    }
}

/// Calculate Bollinger Bands for the latest bar
pub fn calculate_bollinger_bands(
    bars: &[PriceBar],
    period: u32,
    std_dev: f64,
) -> Option<BollingerBandsIndicator> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let series = bollinger_series(&closes, period as usize, std_dev);

    Some(BollingerBandsIndicator {
        upper: series.upper.last().copied().flatten()?,
        middle: series.middle.last().copied().flatten()?,
        lower: series.lower.last().copied().flatten()?,
        period,
        std_dev,
    })
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(bars: &[PriceBar]) -> Option<BollingerBandsIndicator> {
    calculate_bollinger_bands(bars, 20, 2.0)
}
