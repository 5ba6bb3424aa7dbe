//! Scan requests, progress events and the caller-owned scan report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::models::evaluation::EvaluationResult;
use crate::signals::categories::OversoldCategory;

/// Closed RSI interval a symbol's latest reading must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiBand {
    pub min: f64,
    pub max: f64,
}

impl RsiBand {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The whole 0..=100 range.
    pub fn full() -> Self {
        Self::new(0.0, 100.0)
    }

    pub fn contains(&self, rsi: f64) -> bool {
        rsi >= self.min && rsi <= self.max
    }
}

impl Default for RsiBand {
    fn default() -> Self {
        Self::new(25.0, 40.0)
    }
}

/// Order of the accepted results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Most oversold first.
    #[default]
    RsiAscending,
    /// Best opportunity first.
    BuyPotentialDescending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub rsi_min: f64,
    pub rsi_max: f64,
    pub min_market_cap: f64,
    /// `None` means no upper limit.
    pub max_market_cap: Option<f64>,
    pub symbols: Vec<String>,
    #[serde(default)]
    pub ranking: RankingPolicy,
}

impl Default for ScanRequest {
    fn default() -> Self {
        let band = RsiBand::default();
        Self {
            rsi_min: band.min,
            rsi_max: band.max,
            min_market_cap: 0.0,
            max_market_cap: None,
            symbols: Vec::new(),
            ranking: RankingPolicy::default(),
        }
    }
}

impl ScanRequest {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_rsi_range(mut self, min: f64, max: f64) -> Self {
        self.rsi_min = min;
        self.rsi_max = max;
        self
    }

    pub fn with_market_cap_range(mut self, min: f64, max: Option<f64>) -> Self {
        self.min_market_cap = min;
        self.max_market_cap = max;
        self
    }

    pub fn with_ranking(mut self, ranking: RankingPolicy) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn rsi_band(&self) -> RsiBand {
        RsiBand::new(self.rsi_min, self.rsi_max)
    }

    /// Checked before any provider call is made.
    pub fn validate(&self) -> Result<(), ScanError> {
        if !self.rsi_min.is_finite() || !self.rsi_max.is_finite() {
            return Err(ScanError::InvalidRequest(
                "RSI bounds must be finite".to_string(),
            ));
        }
        if self.rsi_min > self.rsi_max {
            return Err(ScanError::InvalidRequest(format!(
                "rsi_min {} is greater than rsi_max {}",
                self.rsi_min, self.rsi_max
            )));
        }
        if !self.min_market_cap.is_finite() || self.min_market_cap < 0.0 {
            return Err(ScanError::InvalidRequest(format!(
                "min_market_cap must be a non-negative number, got {}",
                self.min_market_cap
            )));
        }
        if let Some(max) = self.max_market_cap {
            if max.is_nan() || self.min_market_cap > max {
                return Err(ScanError::InvalidRequest(format!(
                    "min_market_cap {} is greater than max_market_cap {}",
                    self.min_market_cap, max
                )));
            }
        }
        Ok(())
    }

    /// Unknown market cap counts as 0: it passes a minimum of 0 but never a
    /// strictly positive minimum.
    pub fn market_cap_allows(&self, market_cap: Option<f64>) -> bool {
        let cap = market_cap.unwrap_or(0.0);
        self.min_market_cap <= cap && self.max_market_cap.map_or(true, |max| cap <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStage {
    Liquidity,
    Evaluation,
}

/// One progress event; purely observational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub stage: ScanStage,
    pub processed: usize,
    pub total: usize,
    pub symbol: String,
}

impl ScanProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCounts {
    pub insufficient_history: usize,
    pub rsi_undefined: usize,
    pub rsi_out_of_range: usize,
}

impl RejectionCounts {
    pub fn total(&self) -> usize {
        self.insufficient_history + self.rsi_undefined + self.rsi_out_of_range
    }
}

/// How a finished scan should be reported to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    Matches,
    NoMatches,
    EmptyUniverse,
    SourceUnreachable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Accepted results in ranking order.
    pub results: Vec<EvaluationResult>,
    pub ranking: RankingPolicy,
    /// Distinct symbols in the request.
    pub total_symbols: usize,
    /// Symbols dropped by the liquidity pre-ranking cap.
    pub below_liquidity_cut: usize,
    pub evaluated: usize,
    pub rejections: RejectionCounts,
    /// Symbols whose data could not be fetched, in the liquidity or evaluation stage.
    pub failed: usize,
    pub filtered_by_market_cap: usize,
    pub source_reachable: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ScanReport {
    pub fn outcome(&self) -> ScanOutcome {
        if !self.results.is_empty() {
            ScanOutcome::Matches
        } else if self.total_symbols == 0 {
            ScanOutcome::EmptyUniverse
        } else if !self.source_reachable {
            ScanOutcome::SourceUnreachable
        } else {
            ScanOutcome::NoMatches
        }
    }

    pub fn duration_secs(&self) -> f64 {
        (self.completed_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Detail lookup for one result of this scan.
    pub fn find(&self, symbol: &str) -> Option<&EvaluationResult> {
        self.results.iter().find(|r| r.symbol == symbol)
    }

    pub fn by_category(&self, category: OversoldCategory) -> Vec<&EvaluationResult> {
        self.results
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }

    pub fn category_counts(&self) -> BTreeMap<OversoldCategory, usize> {
        let mut counts = BTreeMap::new();
        for result in &self.results {
            *counts.entry(result.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn average_rsi(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let sum: f64 = self.results.iter().map(|r| r.latest_rsi).sum();
        Some(sum / self.results.len() as f64)
    }

    pub fn summary(&self) -> String {
        format!(
            "Scanned {} symbols in {:.1}s: {} matched, {} rejected, {} failed, {} outside market cap",
            self.total_symbols,
            self.duration_secs(),
            self.results.len(),
            self.rejections.total(),
            self.failed,
            self.filtered_by_market_cap
        )
    }
}
