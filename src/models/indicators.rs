use serde::{Deserialize, Serialize};

use crate::models::price::PriceSeries;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<(u32, u32, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmaIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BollingerBandsIndicator {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub period: u32,
    pub std_dev: f64,
}

/// How an EMA behaves before it has seen `period` observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaWarmup {
    /// Undefined until `period` values have been observed.
    #[default]
    Strict,
    /// Shrink the period to the series length and emit from the first value.
    ShrinkToFit,
}

/// Parameters for every indicator column of an [`IndicatorFrame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub ema_short: usize,
    pub ema_long: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub volume_window: usize,
    pub trend_window: usize,
    pub ema_warmup: EmaWarmup,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_short: 50,
            ema_long: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            volume_window: 20,
            trend_window: 30,
            ema_warmup: EmaWarmup::Strict,
        }
    }
}

impl IndicatorParams {
    /// Stable textual key for caching computations made with these parameters.
    pub fn fingerprint(&self) -> String {
        format!(
            "rsi{}-ema{}/{}-macd{}/{}/{}-bb{}x{}-vol{}-trend{}-{:?}",
            self.rsi_period,
            self.ema_short,
            self.ema_long,
            self.macd_fast,
            self.macd_slow,
            self.macd_signal,
            self.bollinger_period,
            self.bollinger_std_dev,
            self.volume_window,
            self.trend_window,
            self.ema_warmup
        )
    }
}

/// Per-bar indicator columns aligned 1:1 with the source series.
///
/// `None` marks a value without enough warm-up history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub rsi: Vec<Option<f64>>,
    pub ema_short: Vec<Option<f64>>,
    pub ema_long: Vec<Option<f64>>,
    pub macd_line: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub bollinger_mid: Vec<Option<f64>>,
    pub bollinger_upper: Vec<Option<f64>>,
    pub bollinger_lower: Vec<Option<f64>>,
    pub volume_average: Vec<Option<f64>>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.rsi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }
}

/// A price series together with the indicator frame derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedSeries {
    pub series: PriceSeries,
    pub frame: IndicatorFrame,
    pub params: IndicatorParams,
}

/// Indicator values at the latest bar, the input of the buy-potential score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: f64,
    pub rsi: Option<f64>,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub macd_histogram_prev: Option<f64>,
    pub bollinger_mid: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub volume: f64,
    pub volume_average: Option<f64>,
    pub volume_ratio: f64,
    /// Fractional close-to-close change over the trend window.
    pub trend_return: Option<f64>,
}
