//! Unit tests for buy-potential scoring

use dipscan::models::IndicatorSnapshot;
use dipscan::signals::scoring::{
    buy_potential, ema_trend_fraction, rsi_depth_fraction, score_snapshot, volume_fraction,
    ScoreWeights, MAX_SCORE,
};

fn strong_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot {
        price: 90.0,
        rsi: Some(15.0),
        ema_short: Some(85.0),
        ema_long: Some(80.0),
        macd_line: Some(1.0),
        macd_signal: Some(0.5),
        macd_histogram: Some(0.5),
        macd_histogram_prev: Some(0.2),
        bollinger_mid: Some(100.0),
        bollinger_upper: Some(105.0),
        bollinger_lower: Some(95.0),
        volume: 2_500_000.0,
        volume_average: Some(1_000_000.0),
        volume_ratio: 2.5,
        trend_return: Some(0.1),
    }
}

fn weak_snapshot() -> IndicatorSnapshot {
    IndicatorSnapshot {
        rsi: Some(55.0),
        ema_long: Some(120.0),
        macd_line: Some(-1.0),
        macd_signal: Some(-0.5),
        macd_histogram: Some(-0.5),
        macd_histogram_prev: Some(-0.1),
        bollinger_mid: Some(85.0),
        bollinger_lower: Some(80.0),
        volume_ratio: 0.8,
        trend_return: Some(-0.2),
        ..strong_snapshot()
    }
}

#[test]
fn test_default_weights_sum_to_max() {
    assert_eq!(ScoreWeights::default().total(), MAX_SCORE);
    assert!(ScoreWeights::new(30, 15, 20, 15, 10, 5).is_err());
    assert!(ScoreWeights::new(40, 10, 20, 10, 10, 10).is_ok());
}

#[test]
fn test_strong_snapshot_scores_maximum() {
    assert_eq!(buy_potential(&strong_snapshot(), &ScoreWeights::default()), 100);
}

#[test]
fn test_weak_snapshot_scores_zero() {
    assert_eq!(buy_potential(&weak_snapshot(), &ScoreWeights::default()), 0);
}

#[test]
fn test_buy_potential_is_deterministic() {
    let snapshot = strong_snapshot();
    let weights = ScoreWeights::default();
    let first = score_snapshot(&snapshot, &weights);
    let second = score_snapshot(&snapshot, &weights);
    assert_eq!(first, second);
    assert_eq!(first.total(), second.total());
}

#[test]
fn test_sub_scores_never_exceed_weights() {
    let weights = ScoreWeights::default();
    let score = score_snapshot(&strong_snapshot(), &weights);
    assert!(score.rsi_depth <= f64::from(weights.rsi_depth));
    assert!(score.macd <= f64::from(weights.macd));
    assert!(score.total() <= 100);
}

#[test]
fn test_deeper_rsi_never_scores_lower() {
    let readings = [45.0, 40.0, 35.0, 30.0, 25.0, 20.0, 10.0];
    let fractions: Vec<f64> = readings.iter().map(|r| rsi_depth_fraction(Some(*r))).collect();
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(rsi_depth_fraction(None), 0.0);
}

#[test]
fn test_higher_volume_never_scores_lower() {
    let ratios = [0.5, 1.2, 1.5, 2.0, 3.0];
    let fractions: Vec<f64> = ratios.iter().map(|r| volume_fraction(*r)).collect();
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_ema_trend_partial_credit_near_average() {
    assert_eq!(ema_trend_fraction(101.0, Some(100.0)), 1.0);
    assert_eq!(ema_trend_fraction(96.0, Some(100.0)), 0.4);
    assert_eq!(ema_trend_fraction(90.0, Some(100.0)), 0.0);
    assert_eq!(ema_trend_fraction(90.0, None), 0.0);
}
