//! Environment-driven configuration for the scanner and its binary.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::indicators::{EmaWarmup, IndicatorParams};
use crate::models::scan::{RankingPolicy, ScanRequest};
use crate::services::fetch::FetchPolicy;
use crate::signals::engine::{EvaluatorConfig, MIN_BARS};
use crate::signals::scoring::ScoreWeights;

/// Deployment environment from `APP_ENV` or `ENVIRONMENT`, lowercased.
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .unwrap_or_else(|_| "sandbox".to_string())
        .to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// One symbol at a time, in universe order.
    #[default]
    Sequential,
    /// Fixed-size batches evaluated in parallel.
    Concurrent { batch_size: usize },
}

/// Keep only the `top_n` most traded symbols before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityConfig {
    pub top_n: usize,
    pub lookback_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub min_bars: usize,
    /// Calendar days of history requested per symbol.
    pub lookback_days: u32,
    pub liquidity: Option<LiquidityConfig>,
    pub mode: ScanMode,
    pub fetch: FetchPolicy,
    /// `None` disables the analysis cache.
    pub cache_ttl: Option<Duration>,
    pub indicators: IndicatorParams,
    pub weights: ScoreWeights,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_bars: MIN_BARS,
            lookback_days: 730,
            liquidity: None,
            mode: ScanMode::Sequential,
            fetch: FetchPolicy::default(),
            cache_ttl: Some(Duration::from_secs(300)),
            indicators: IndicatorParams::default(),
            weights: ScoreWeights::default(),
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl ScannerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let liquidity = parsed::<usize>(&lookup, "SCAN_LIQUIDITY_TOP_N")
            .filter(|n| *n > 0)
            .map(|top_n| LiquidityConfig {
                top_n,
                lookback_days: parsed(&lookup, "SCAN_LIQUIDITY_LOOKBACK_DAYS").unwrap_or(30),
            });

        let mode = match lookup("SCAN_MODE").map(|m| m.trim().to_lowercase()).as_deref() {
            Some("concurrent") => ScanMode::Concurrent {
                batch_size: parsed::<usize>(&lookup, "SCAN_BATCH_SIZE")
                    .filter(|n| *n > 0)
                    .unwrap_or(25),
            },
            _ => ScanMode::Sequential,
        };

        let fetch = FetchPolicy {
            timeout: parsed(&lookup, "SCAN_FETCH_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch.timeout),
            metadata_timeout: parsed(&lookup, "SCAN_METADATA_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch.metadata_timeout),
            retry_attempts: parsed(&lookup, "SCAN_RETRY_ATTEMPTS")
                .unwrap_or(defaults.fetch.retry_attempts),
            ..defaults.fetch.clone()
        };

        let cache_ttl = match parsed::<u64>(&lookup, "SCAN_CACHE_TTL_SECS") {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.cache_ttl,
        };

        let ema_warmup = match lookup("SCAN_EMA_WARMUP").map(|w| w.trim().to_lowercase()).as_deref() {
            Some("shrink") | Some("shrink_to_fit") => EmaWarmup::ShrinkToFit,
            _ => EmaWarmup::Strict,
        };

        Self {
            min_bars: parsed(&lookup, "SCAN_MIN_BARS").unwrap_or(defaults.min_bars),
            lookback_days: parsed(&lookup, "SCAN_LOOKBACK_DAYS").unwrap_or(defaults.lookback_days),
            liquidity,
            mode,
            fetch,
            cache_ttl,
            indicators: IndicatorParams {
                ema_warmup,
                ..defaults.indicators
            },
            weights: defaults.weights,
        }
    }

    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            min_bars: self.min_bars,
            indicators: self.indicators.clone(),
            weights: self.weights.clone(),
        }
    }
}

/// Reads the scan request bounds from the environment.
///
/// `SYMBOLS` is a comma-separated list; when unset, `default_symbols` is used.
pub fn request_from_env(default_symbols: &[String]) -> ScanRequest {
    request_from_lookup(|key| env::var(key).ok(), default_symbols)
}

pub fn request_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
    default_symbols: &[String],
) -> ScanRequest {
    let defaults = ScanRequest::default();
    let symbols = lookup("SYMBOLS")
        .map(|s| {
            s.split(',')
                .map(|sym| sym.trim().to_uppercase())
                .filter(|sym| !sym.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default_symbols.to_vec());

    let ranking = match lookup("SCAN_RANKING").map(|r| r.trim().to_lowercase()).as_deref() {
        Some("buy_potential") => RankingPolicy::BuyPotentialDescending,
        _ => RankingPolicy::RsiAscending,
    };

    ScanRequest::new(symbols)
        .with_rsi_range(
            parsed(&lookup, "SCAN_RSI_MIN").unwrap_or(defaults.rsi_min),
            parsed(&lookup, "SCAN_RSI_MAX").unwrap_or(defaults.rsi_max),
        )
        .with_market_cap_range(
            parsed(&lookup, "SCAN_MIN_MARKET_CAP").unwrap_or(defaults.min_market_cap),
            parsed(&lookup, "SCAN_MAX_MARKET_CAP"),
        )
        .with_ranking(ranking)
}
