//! MACD (Moving Average Convergence Divergence) indicator

use serde::{Deserialize, Serialize};

use crate::common::math;
use crate::models::indicators::{EmaWarmup, MacdIndicator};
use crate::models::price::PriceBar;

/// MACD columns aligned with the input closes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
pub fn macd_series(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    warmup: EmaWarmup,
) -> MacdSeries {
    let input: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    let fast = math::ema_series(&input, fast_period, warmup);
    let slow = math::ema_series(&input, slow_period, warmup);

    let line: Vec<Option<f64>> = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal = math::ema_series(&line, signal_period, warmup);
    let histogram = line
        .iter()
        .zip(&signal)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}

/// Latest MACD reading of a bar sequence.
pub fn calculate_macd(
    bars: &[PriceBar],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Option<MacdIndicator> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let series = macd_series(
        &closes,
        fast_period as usize,
        slow_period as usize,
        signal_period as usize,
        EmaWarmup::Strict,
    );

    Some(MacdIndicator {
        macd: series.line.last().copied().flatten()?,
        signal: series.signal.last().copied().flatten()?,
        histogram: series.histogram.last().copied().flatten()?,
        period: Some((fast_period, slow_period, signal_period)),
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(bars: &[PriceBar]) -> Option<MacdIndicator> {
    calculate_macd(bars, 12, 26, 9)
}

/// Agreement between the MACD line, its signal and the histogram direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverState {
    /// Line above signal with a positive histogram.
    Bullish,
    /// Line still at or below signal, but the histogram is rising.
    Converging,
    Bearish,
    Undefined,
}

pub fn detect_crossover(
    line: Option<f64>,
    signal: Option<f64>,
    histogram: Option<f64>,
    previous_histogram: Option<f64>,
) -> CrossoverState {
    let (Some(line), Some(signal), Some(histogram)) = (line, signal, histogram) else {
        return CrossoverState::Undefined;
    };

    if line > signal && histogram > 0.0 {
        CrossoverState::Bullish
    } else if previous_histogram.is_some_and(|prev| histogram > prev) {
        CrossoverState::Converging
    } else {
        CrossoverState::Bearish
    }
}
