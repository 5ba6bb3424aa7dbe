//! Oversold category thresholds

use serde::{Deserialize, Serialize};

/// Upper RSI bound of each category, inclusive.
pub struct CategoryThresholds;

impl CategoryThresholds {
    pub const SUPER_OVERSOLD: f64 = 25.0;
    pub const OVERSOLD: f64 = 30.0;
    pub const MILD_OVERSOLD: f64 = 35.0;
    pub const WATCHLIST: f64 = 40.0;
}

/// Classification of the latest RSI.
///
/// Buckets are closed above and open below, except the first which takes
/// everything at or under 25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OversoldCategory {
    SuperOversold,
    Oversold,
    MildOversold,
    Watchlist,
    /// Above every oversold bucket.
    Rejected,
}

impl OversoldCategory {
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi <= CategoryThresholds::SUPER_OVERSOLD {
            OversoldCategory::SuperOversold
        } else if rsi <= CategoryThresholds::OVERSOLD {
            OversoldCategory::Oversold
        } else if rsi <= CategoryThresholds::MILD_OVERSOLD {
            OversoldCategory::MildOversold
        } else if rsi <= CategoryThresholds::WATCHLIST {
            OversoldCategory::Watchlist
        } else {
            OversoldCategory::Rejected
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OversoldCategory::SuperOversold => "Super oversold",
            OversoldCategory::Oversold => "Oversold",
            OversoldCategory::MildOversold => "Mildly oversold",
            OversoldCategory::Watchlist => "Watchlist",
            OversoldCategory::Rejected => "Not oversold",
        }
    }

    pub fn is_oversold(&self) -> bool {
        !matches!(self, OversoldCategory::Rejected)
    }

    pub fn all() -> [OversoldCategory; 5] {
        [
            OversoldCategory::SuperOversold,
            OversoldCategory::Oversold,
            OversoldCategory::MildOversold,
            OversoldCategory::Watchlist,
            OversoldCategory::Rejected,
        ]
    }
}
