//! Per-symbol evaluation: indicators, RSI band, category and buy potential.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Rejection;
use crate::indicators::frame;
use crate::models::evaluation::EvaluationResult;
use crate::models::indicators::{AnalyzedSeries, IndicatorParams};
use crate::models::price::PriceSeries;
use crate::models::scan::RsiBand;
use crate::services::fetch::{lookup_metadata, FetchPolicy};
use crate::services::market_data::MetadataProvider;
use crate::signals::categories::OversoldCategory;
use crate::signals::scoring::{score_snapshot, ScoreWeights};

pub const MIN_BARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Series shorter than this are rejected before any indicator work.
    pub min_bars: usize,
    pub indicators: IndicatorParams,
    pub weights: ScoreWeights,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            min_bars: MIN_BARS,
            indicators: IndicatorParams::default(),
            weights: ScoreWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StockEvaluator {
    config: EvaluatorConfig,
}

impl StockEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Rejects a series shorter than the configured minimum history.
    pub fn check_history(&self, series: &PriceSeries) -> Result<(), Rejection> {
        let required = self.config.min_bars.max(1);
        if series.len() < required {
            return Err(Rejection::InsufficientHistory {
                bars: series.len(),
                required,
            });
        }
        Ok(())
    }

    /// Checks the history length and computes the indicator frame.
    pub fn analyze(&self, series: PriceSeries) -> Result<Arc<AnalyzedSeries>, Rejection> {
        self.check_history(&series)?;
        Ok(Arc::new(frame::analyze(series, &self.config.indicators)))
    }

    /// Applies the RSI band to an analysed series and scores it.
    ///
    /// The history length is checked again, since the analysis may come from a
    /// cache filled by an evaluator with a lower minimum. The result carries
    /// unknown metadata; see [`StockEvaluator::enrich`].
    pub fn assess(
        &self,
        symbol: &str,
        analysis: Arc<AnalyzedSeries>,
        band: &RsiBand,
    ) -> Result<EvaluationResult, Rejection> {
        self.check_history(&analysis.series)?;
        let snapshot = frame::snapshot(&analysis).ok_or(Rejection::InsufficientHistory {
            bars: 0,
            required: self.config.min_bars.max(1),
        })?;
        let rsi = snapshot.rsi.ok_or(Rejection::RsiUndefined)?;
        if !band.contains(rsi) {
            return Err(Rejection::RsiOutOfRange {
                rsi,
                min: band.min,
                max: band.max,
            });
        }

        let score = score_snapshot(&snapshot, &self.config.weights);
        let as_of = analysis
            .series
            .latest()
            .map(|bar| bar.timestamp)
            .unwrap_or_default();

        Ok(EvaluationResult {
            symbol: symbol.to_string(),
            as_of,
            latest_price: snapshot.price,
            latest_rsi: rsi,
            latest_ema_short: snapshot.ema_short,
            latest_ema_long: snapshot.ema_long,
            latest_volume: snapshot.volume,
            average_volume: snapshot.volume_average,
            volume_ratio: snapshot.volume_ratio,
            market_cap: None,
            sector: None,
            category: OversoldCategory::from_rsi(rsi),
            buy_potential: score.total(),
            score,
            snapshot,
            source: analysis,
        })
    }

    /// Pure evaluation of one series without metadata.
    pub fn evaluate_series(
        &self,
        symbol: &str,
        series: PriceSeries,
        band: &RsiBand,
    ) -> Result<EvaluationResult, Rejection> {
        let analysis = self.analyze(series)?;
        self.assess(symbol, analysis, band)
    }

    /// Attaches market cap and sector; a failed lookup leaves them unknown.
    pub async fn enrich(
        &self,
        result: EvaluationResult,
        metadata: &dyn MetadataProvider,
        policy: &FetchPolicy,
    ) -> EvaluationResult {
        let info = lookup_metadata(metadata, &result.symbol, policy).await;
        result.with_metadata(info)
    }

    /// Full evaluation of one symbol, metadata included.
    pub async fn evaluate(
        &self,
        symbol: &str,
        series: PriceSeries,
        band: &RsiBand,
        metadata: &dyn MetadataProvider,
        policy: &FetchPolicy,
    ) -> Result<EvaluationResult, Rejection> {
        let result = self.evaluate_series(symbol, series, band).map_err(|rejection| {
            debug!(symbol = %symbol, reason = %rejection, "Evaluator: rejected {}", symbol);
            rejection
        })?;
        Ok(self.enrich(result, metadata, policy).await)
    }
}
