//! Shared data models spanning the screening layers.

pub mod evaluation;
pub mod indicators;
pub mod price;
pub mod scan;

pub use evaluation::{EvaluationResult, SymbolMetadata};
pub use indicators::{
    AnalyzedSeries, BollingerBandsIndicator, EmaIndicator, EmaWarmup, IndicatorFrame,
    IndicatorParams, IndicatorSnapshot, MacdIndicator, RsiIndicator,
};
pub use price::{PriceBar, PriceSeries};
pub use scan::{
    RankingPolicy, RejectionCounts, RsiBand, ScanOutcome, ScanProgress, ScanReport, ScanRequest,
    ScanStage,
};
