//! Universe scanner: orchestrates a full oversold scan.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::AnalysisCache;
use crate::config::{ScanMode, ScannerConfig};
use crate::core::liquidity::{rank_by_liquidity, LiquidityCut};
use crate::core::pipeline::{Pipeline, SymbolOutcome};
use crate::core::progress::{NoopProgress, ProgressSink};
use crate::core::runtime::{run_concurrent, run_sequential};
use crate::error::{Rejection, ScanError};
use crate::models::evaluation::EvaluationResult;
use crate::models::scan::{RankingPolicy, RejectionCounts, ScanReport, ScanRequest};
use crate::services::market_data::{MetadataProvider, PriceProvider};
use crate::services::universe::dedupe_symbols;
use crate::signals::engine::StockEvaluator;

/// Orders accepted results; ties always fall back to the symbol.
pub fn rank_results(results: &mut [EvaluationResult], ranking: RankingPolicy) {
    results.sort_by(|a, b| {
        let primary = match ranking {
            RankingPolicy::RsiAscending => a
                .latest_rsi
                .partial_cmp(&b.latest_rsi)
                .unwrap_or(Ordering::Equal),
            RankingPolicy::BuyPotentialDescending => b
                .buy_potential
                .cmp(&a.buy_potential)
                .then_with(|| {
                    a.latest_rsi
                        .partial_cmp(&b.latest_rsi)
                        .unwrap_or(Ordering::Equal)
                }),
        };
        primary.then_with(|| a.symbol.cmp(&b.symbol))
    });
}

pub struct UniverseScanner {
    prices: Arc<dyn PriceProvider>,
    metadata: Arc<dyn MetadataProvider>,
    evaluator: Arc<StockEvaluator>,
    config: ScannerConfig,
    cache: Option<Arc<AnalysisCache>>,
}

impl UniverseScanner {
    pub fn new(
        prices: Arc<dyn PriceProvider>,
        metadata: Arc<dyn MetadataProvider>,
        config: ScannerConfig,
    ) -> Self {
        let cache = config.cache_ttl.map(|ttl| Arc::new(AnalysisCache::new(ttl)));
        Self {
            prices,
            metadata,
            evaluator: Arc::new(StockEvaluator::new(config.evaluator_config())),
            config,
            cache,
        }
    }

    /// Shares an existing cache, e.g. between scanners over the same provider.
    pub fn with_cache(mut self, cache: Arc<AnalysisCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn cache(&self) -> Option<&Arc<AnalysisCache>> {
        self.cache.as_ref()
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub async fn scan(&self, request: &ScanRequest) -> Result<ScanReport, ScanError> {
        self.scan_with(request, &NoopProgress, &CancellationToken::new())
            .await
    }

    /// Runs a scan, reporting progress and stopping early once `cancel` fires.
    ///
    /// Each call returns a fresh report; a total data-source outage yields
    /// an empty report with `source_reachable == false`.
    pub async fn scan_with(
        &self,
        request: &ScanRequest,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<ScanReport, ScanError> {
        request.validate()?;
        let started_at = Utc::now();
        if let Some(cache) = &self.cache {
            cache.clear_expired();
        }

        let symbols = dedupe_symbols(&request.symbols);
        let total_symbols = symbols.len();
        info!(
            symbols = total_symbols,
            rsi_min = request.rsi_min,
            rsi_max = request.rsi_max,
            "Scanner: starting scan of {} symbols",
            total_symbols
        );

        let cut = match &self.config.liquidity {
            Some(liquidity) => {
                rank_by_liquidity(
                    Arc::clone(&self.prices),
                    &symbols,
                    liquidity,
                    &self.config.fetch,
                    progress,
                    cancel,
                )
                .await?
            }
            None => LiquidityCut {
                kept: symbols,
                failed: 0,
            },
        };
        let candidates = cut.kept;
        let below_liquidity_cut = total_symbols - candidates.len() - cut.failed;

        let pipeline = Pipeline {
            prices: Arc::clone(&self.prices),
            metadata: Arc::clone(&self.metadata),
            evaluator: Arc::clone(&self.evaluator),
            cache: self.cache.clone(),
            policy: self.config.fetch.clone(),
            lookback_days: self.config.lookback_days,
            band: request.rsi_band(),
        };

        let outcomes = match self.config.mode {
            ScanMode::Sequential => run_sequential(&pipeline, &candidates, progress, cancel).await?,
            ScanMode::Concurrent { batch_size } => {
                run_concurrent(&pipeline, &candidates, batch_size, progress, cancel).await?
            }
        };

        let mut results = Vec::new();
        let mut rejections = RejectionCounts::default();
        let mut failed = cut.failed;
        let mut filtered_by_market_cap = 0;

        for (symbol, outcome) in outcomes {
            match outcome {
                SymbolOutcome::Accepted(result) => {
                    if request.market_cap_allows(result.market_cap) {
                        results.push(*result);
                    } else {
                        debug!(symbol = %symbol, "Scanner: {} outside market cap range", symbol);
                        filtered_by_market_cap += 1;
                    }
                }
                SymbolOutcome::Rejected(rejection) => {
                    debug!(symbol = %symbol, reason = %rejection, "Scanner: rejected {}", symbol);
                    match rejection {
                        Rejection::InsufficientHistory { .. } => {
                            rejections.insufficient_history += 1
                        }
                        Rejection::RsiUndefined => rejections.rsi_undefined += 1,
                        Rejection::RsiOutOfRange { .. } => rejections.rsi_out_of_range += 1,
                    }
                }
                SymbolOutcome::Failed(e) => {
                    warn!(symbol = %symbol, error = %e, "Scanner: failed to fetch {}", symbol);
                    failed += 1;
                }
            }
        }

        rank_results(&mut results, request.ranking);

        let evaluated = candidates.len();
        let attempted = evaluated + cut.failed;
        let source_reachable = attempted == 0 || failed < attempted;
        if !source_reachable {
            warn!(
                failed,
                "Scanner: every symbol failed to fetch, data source looks unreachable"
            );
        }

        let report = ScanReport {
            results,
            ranking: request.ranking,
            total_symbols,
            below_liquidity_cut,
            evaluated,
            rejections,
            failed,
            filtered_by_market_cap,
            source_reachable,
            started_at,
            completed_at: Utc::now(),
        };
        info!("Scanner: {}", report.summary());
        Ok(report)
    }
}
