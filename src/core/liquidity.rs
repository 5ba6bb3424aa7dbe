//! Liquidity pre-ranking: keep the most traded symbols before the full scan.

use std::cmp::Ordering;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::common::math::mean;
use crate::config::LiquidityConfig;
use crate::core::progress::ProgressSink;
use crate::error::ScanError;
use crate::models::scan::{ScanProgress, ScanStage};
use crate::services::fetch::{fetch_series, FetchPolicy};
use crate::services::market_data::PriceProvider;

const LIQUIDITY_CONCURRENCY: usize = 8;

/// Symbols kept by the liquidity cut, plus how many could not be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiquidityCut {
    pub kept: Vec<String>,
    pub failed: usize,
}

/// Ranks `symbols` by mean daily volume over the liquidity window and keeps
/// the top `config.top_n`. Symbols whose volume cannot be fetched drop out
/// and are counted in `failed`.
pub async fn rank_by_liquidity(
    prices: Arc<dyn PriceProvider>,
    symbols: &[String],
    config: &LiquidityConfig,
    policy: &FetchPolicy,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<LiquidityCut, ScanError> {
    if symbols.len() <= config.top_n {
        return Ok(LiquidityCut {
            kept: symbols.to_vec(),
            failed: 0,
        });
    }

    let total = symbols.len();
    let mut volumes: Vec<(String, f64)> = Vec::with_capacity(total);
    let mut fetches = stream::iter(symbols.iter().cloned())
        .map(|symbol| {
            let prices = Arc::clone(&prices);
            async move {
                let result =
                    fetch_series(prices.as_ref(), &symbol, config.lookback_days, policy).await;
                (symbol, result)
            }
        })
        .buffer_unordered(LIQUIDITY_CONCURRENCY);

    let mut processed = 0;
    let mut failed = 0;
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ScanError::Cancelled),
            next = fetches.next() => next,
        };
        let Some((symbol, result)) = next else {
            break;
        };

        processed += 1;
        match result {
            Ok(series) => {
                let window = series.trailing_days(config.lookback_days);
                let avg = mean(&window.iter().map(|b| b.volume).collect::<Vec<_>>());
                if let Some(avg) = avg {
                    volumes.push((symbol.clone(), avg));
                }
            }
            Err(e) => {
                debug!(symbol = %symbol, error = %e, "Liquidity: skipping {}", symbol);
                failed += 1;
            }
        }
        progress.report(&ScanProgress {
            stage: ScanStage::Liquidity,
            processed,
            total,
            symbol,
        });
    }

    volumes.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    volumes.truncate(config.top_n);

    info!(
        kept = volumes.len(),
        failed,
        total,
        "Liquidity: kept {} of {} symbols",
        volumes.len(),
        total
    );
    Ok(LiquidityCut {
        kept: volumes.into_iter().map(|(symbol, _)| symbol).collect(),
        failed,
    })
}
