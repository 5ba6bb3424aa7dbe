//! The per-symbol unit of work shared by every scan mode.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{AnalysisCache, AnalysisKey};
use crate::error::{ProviderError, Rejection};
use crate::models::evaluation::EvaluationResult;
use crate::models::indicators::AnalyzedSeries;
use crate::models::scan::RsiBand;
use crate::services::fetch::{fetch_series, FetchPolicy};
use crate::services::market_data::{MetadataProvider, PriceProvider};
use crate::signals::engine::StockEvaluator;

#[derive(Debug, Clone)]
pub enum SymbolOutcome {
    Accepted(Box<EvaluationResult>),
    Rejected(Rejection),
    Failed(ProviderError),
}

/// Everything a worker needs to evaluate a symbol, cheap to clone into tasks.
#[derive(Clone)]
pub struct Pipeline {
    pub prices: Arc<dyn PriceProvider>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub evaluator: Arc<StockEvaluator>,
    pub cache: Option<Arc<AnalysisCache>>,
    pub policy: FetchPolicy,
    pub lookback_days: u32,
    pub band: RsiBand,
}

impl Pipeline {
    async fn analysis(&self, symbol: &str) -> Result<Arc<AnalyzedSeries>, SymbolOutcome> {
        let key = AnalysisKey::new(symbol, self.lookback_days, &self.evaluator.config().indicators);
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            debug!(symbol = %symbol, "Pipeline: cache hit for {}", symbol);
            return Ok(cached);
        }

        let series = fetch_series(self.prices.as_ref(), symbol, self.lookback_days, &self.policy)
            .await
            .map_err(SymbolOutcome::Failed)?;
        let analysis = self
            .evaluator
            .analyze(series)
            .map_err(SymbolOutcome::Rejected)?;

        if let Some(cache) = &self.cache {
            cache.insert(key, Arc::clone(&analysis));
        }
        Ok(analysis)
    }

    /// Fetch (or reuse), evaluate against the band, then attach metadata.
    pub async fn run(&self, symbol: &str) -> SymbolOutcome {
        let analysis = match self.analysis(symbol).await {
            Ok(analysis) => analysis,
            Err(outcome) => return outcome,
        };

        match self.evaluator.assess(symbol, analysis, &self.band) {
            Ok(result) => {
                let enriched = self
                    .evaluator
                    .enrich(result, self.metadata.as_ref(), &self.policy)
                    .await;
                SymbolOutcome::Accepted(Box::new(enriched))
            }
            Err(rejection) => SymbolOutcome::Rejected(rejection),
        }
    }
}
