//! Unit tests for oversold categories

use dipscan::signals::categories::{CategoryThresholds, OversoldCategory};

#[test]
fn test_category_boundaries_are_inclusive_above() {
    assert_eq!(OversoldCategory::from_rsi(0.0), OversoldCategory::SuperOversold);
    assert_eq!(OversoldCategory::from_rsi(25.0), OversoldCategory::SuperOversold);
    assert_eq!(OversoldCategory::from_rsi(25.01), OversoldCategory::Oversold);
    assert_eq!(OversoldCategory::from_rsi(30.0), OversoldCategory::Oversold);
    assert_eq!(OversoldCategory::from_rsi(35.0), OversoldCategory::MildOversold);
    assert_eq!(OversoldCategory::from_rsi(40.0), OversoldCategory::Watchlist);
    assert_eq!(OversoldCategory::from_rsi(40.01), OversoldCategory::Rejected);
    assert_eq!(OversoldCategory::from_rsi(100.0), OversoldCategory::Rejected);
}

#[test]
fn test_categories_are_ordered_by_depth() {
    let all = OversoldCategory::all();
    assert!(all.windows(2).all(|w| w[0] < w[1]));
    assert!(CategoryThresholds::SUPER_OVERSOLD < CategoryThresholds::WATCHLIST);
}

#[test]
fn test_only_rejected_is_not_oversold() {
    let oversold: Vec<_> = OversoldCategory::all()
        .into_iter()
        .filter(|c| c.is_oversold())
        .collect();
    assert_eq!(oversold.len(), 4);
    assert!(!OversoldCategory::Rejected.is_oversold());
}
