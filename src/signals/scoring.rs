//! Buy-potential scoring
//!
//! Six independent sub-scores, each a banded fraction in [0, 1] scaled by its
//! maximum points. Within a sub-score a more oversold, more bullish or more
//! active reading never scores lower than a weaker one.

use serde::{Deserialize, Serialize};

use crate::indicators::momentum::{detect_crossover, CrossoverState};
use crate::models::indicators::IndicatorSnapshot;

pub const MAX_SCORE: u32 = 100;

/// Maximum points per sub-score; they must add up to [`MAX_SCORE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub rsi_depth: u8,
    pub ema_trend: u8,
    pub macd: u8,
    pub volume: u8,
    pub bollinger: u8,
    pub momentum: u8,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            rsi_depth: 30,
            ema_trend: 15,
            macd: 20,
            volume: 15,
            bollinger: 10,
            momentum: 10,
        }
    }
}

impl ScoreWeights {
    pub fn new(
        rsi_depth: u8,
        ema_trend: u8,
        macd: u8,
        volume: u8,
        bollinger: u8,
        momentum: u8,
    ) -> Result<Self, String> {
        let weights = Self {
            rsi_depth,
            ema_trend,
            macd,
            volume,
            bollinger,
            momentum,
        };
        if weights.total() != MAX_SCORE {
            return Err(format!(
                "Score weights must sum to {}, got: {}",
                MAX_SCORE,
                weights.total()
            ));
        }
        Ok(weights)
    }

    pub fn total(&self) -> u32 {
        [
            self.rsi_depth,
            self.ema_trend,
            self.macd,
            self.volume,
            self.bollinger,
            self.momentum,
        ]
        .iter()
        .map(|w| u32::from(*w))
        .sum()
    }
}

/// Points earned by each sub-score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub rsi_depth: f64,
    pub ema_trend: f64,
    pub macd: f64,
    pub volume: f64,
    pub bollinger: f64,
    pub momentum: f64,
}

impl ScoreBreakdown {
    /// Rounded sum, capped at [`MAX_SCORE`].
    pub fn total(&self) -> u8 {
        let sum = self.rsi_depth
            + self.ema_trend
            + self.macd
            + self.volume
            + self.bollinger
            + self.momentum;
        sum.round().clamp(0.0, MAX_SCORE as f64) as u8
    }
}

pub fn rsi_depth_fraction(rsi: Option<f64>) -> f64 {
    match rsi {
        Some(r) if r <= 20.0 => 1.0,
        Some(r) if r <= 25.0 => 0.85,
        Some(r) if r <= 30.0 => 0.65,
        Some(r) if r <= 35.0 => 0.4,
        Some(r) if r <= 40.0 => 0.2,
        _ => 0.0,
    }
}

/// Price above the long EMA scores highest; slightly below still counts.
pub fn ema_trend_fraction(price: f64, ema_long: Option<f64>) -> f64 {
    let Some(ema) = ema_long else { return 0.0 };
    if price > ema {
        1.0
    } else if price >= ema * 0.95 {
        0.4
    } else {
        0.0
    }
}

pub fn macd_fraction(state: CrossoverState) -> f64 {
    match state {
        CrossoverState::Bullish => 1.0,
        CrossoverState::Converging => 0.5,
        CrossoverState::Bearish | CrossoverState::Undefined => 0.0,
    }
}

pub fn volume_fraction(volume_ratio: f64) -> f64 {
    if volume_ratio >= 2.0 {
        1.0
    } else if volume_ratio >= 1.5 {
        0.65
    } else if volume_ratio >= 1.2 {
        0.35
    } else {
        0.0
    }
}

/// Below the lower band scores highest, below the middle band partially.
pub fn bollinger_fraction(price: f64, lower: Option<f64>, middle: Option<f64>) -> f64 {
    if lower.is_some_and(|l| price < l) {
        1.0
    } else if middle.is_some_and(|m| price < m) {
        0.5
    } else {
        0.0
    }
}

pub fn momentum_fraction(trend_return: Option<f64>) -> f64 {
    match trend_return {
        Some(r) if r > 0.05 => 1.0,
        Some(r) if r > 0.0 => 0.6,
        _ => 0.0,
    }
}

pub fn score_snapshot(snapshot: &IndicatorSnapshot, weights: &ScoreWeights) -> ScoreBreakdown {
    let crossover = detect_crossover(
        snapshot.macd_line,
        snapshot.macd_signal,
        snapshot.macd_histogram,
        snapshot.macd_histogram_prev,
    );

    ScoreBreakdown {
        rsi_depth: rsi_depth_fraction(snapshot.rsi) * f64::from(weights.rsi_depth),
        ema_trend: ema_trend_fraction(snapshot.price, snapshot.ema_long)
            * f64::from(weights.ema_trend),
        macd: macd_fraction(crossover) * f64::from(weights.macd),
        volume: volume_fraction(snapshot.volume_ratio) * f64::from(weights.volume),
        bollinger: bollinger_fraction(
            snapshot.price,
            snapshot.bollinger_lower,
            snapshot.bollinger_mid,
        ) * f64::from(weights.bollinger),
        momentum: momentum_fraction(snapshot.trend_return) * f64::from(weights.momentum),
    }
}

/// Composite 0-100 ranking heuristic for the latest snapshot.
pub fn buy_potential(snapshot: &IndicatorSnapshot, weights: &ScoreWeights) -> u8 {
    score_snapshot(snapshot, weights).total()
}
