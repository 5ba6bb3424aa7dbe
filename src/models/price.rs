//! Daily OHLCV bars and the validated series built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn has_valid_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }

    /// Positive finite prices and a non-negative finite volume.
    pub fn is_valid(&self) -> bool {
        self.has_valid_prices() && self.volume.is_finite() && self.volume >= 0.0
    }
}

/// Ordered bars for one symbol, ascending by timestamp.
///
/// Construction validates the series once; afterwards it is never mutated.
/// Gaps (weekends, holidays) are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.has_valid_prices() {
                return Err(SeriesError::InvalidPrice { index });
            }
            if !bar.volume.is_finite() || bar.volume < 0.0 {
                return Err(SeriesError::InvalidVolume { index });
            }
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(SeriesError::NotAscending { index });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Bars whose timestamp lies within `days` of the latest bar.
    pub fn trailing_days(&self, days: u32) -> &[PriceBar] {
        let Some(latest) = self.latest() else {
            return &self.bars;
        };
        let cutoff = latest.timestamp - chrono::Duration::days(i64::from(days));
        let start = self.bars.partition_point(|b| b.timestamp < cutoff);
        &self.bars[start..]
    }
}
