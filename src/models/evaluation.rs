//! The per-symbol record produced by the evaluator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::indicators::{AnalyzedSeries, IndicatorFrame, IndicatorSnapshot};
use crate::models::price::PriceSeries;
use crate::signals::categories::OversoldCategory;
use crate::signals::scoring::ScoreBreakdown;

/// Market capitalisation and sector for a symbol; `None` means unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

impl SymbolMetadata {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn new(market_cap: f64, sector: impl Into<String>) -> Self {
        Self {
            market_cap: Some(market_cap),
            sector: Some(sector.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub symbol: String,
    pub as_of: DateTime<Utc>,
    pub latest_price: f64,
    pub latest_rsi: f64,
    /// EMA over the short period (50 by default).
    pub latest_ema_short: Option<f64>,
    /// EMA over the long period (200 by default).
    pub latest_ema_long: Option<f64>,
    pub latest_volume: f64,
    pub average_volume: Option<f64>,
    pub volume_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    pub category: OversoldCategory,
    pub buy_potential: u8,
    pub score: ScoreBreakdown,
    pub snapshot: IndicatorSnapshot,
    pub source: Arc<AnalyzedSeries>,
}

impl EvaluationResult {
    pub fn with_metadata(mut self, metadata: SymbolMetadata) -> Self {
        self.market_cap = metadata.market_cap.filter(|cap| cap.is_finite() && *cap >= 0.0);
        self.sector = metadata.sector;
        self
    }

    /// Market cap with unknown reported as 0.
    pub fn market_cap_or_zero(&self) -> f64 {
        self.market_cap.unwrap_or(0.0)
    }

    pub fn price_series(&self) -> &PriceSeries {
        &self.source.series
    }

    pub fn indicator_frame(&self) -> &IndicatorFrame {
        &self.source.frame
    }
}
