//! Unit tests for the universe scanner

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dipscan::config::{LiquidityConfig, ScannerConfig};
use dipscan::core::UniverseScanner;
use dipscan::error::{ProviderError, ScanError};
use dipscan::models::{
    RankingPolicy, ScanOutcome, ScanProgress, ScanRequest, ScanStage, SymbolMetadata,
};
use dipscan::services::fetch::FetchPolicy;
use dipscan::services::{InMemoryPriceProvider, NoMetadata, StaticMetadataProvider};
use dipscan::signals::OversoldCategory;
use tokio_util::sync::CancellationToken;

use crate::fixtures::{
    constant_closes, deeply_oversold_closes, mildly_oversold_closes, neutral_closes,
    oversold_closes, rising_closes, series, series_with_volume,
};

fn three_symbols() -> InMemoryPriceProvider {
    InMemoryPriceProvider::new()
        .with_series(series("DIP", &oversold_closes()))
        .with_series(series("FLAT", &neutral_closes()))
        .with_series(series("NEW", &rising_closes(30)))
}

fn scanner(prices: Arc<InMemoryPriceProvider>) -> UniverseScanner {
    UniverseScanner::new(prices, Arc::new(NoMetadata), ScannerConfig::default())
}

fn fast_policy() -> FetchPolicy {
    FetchPolicy {
        timeout: Duration::from_millis(50),
        retry_min_delay: Duration::from_millis(1),
        ..FetchPolicy::default()
    }
}

#[tokio::test]
async fn test_scan_returns_single_oversold_match() {
    let scanner = scanner(Arc::new(three_symbols()));
    let report = scanner
        .scan(&ScanRequest::new(["DIP", "FLAT", "NEW"]))
        .await
        .unwrap();

    assert_eq!(report.outcome(), ScanOutcome::Matches);
    assert_eq!(report.results.len(), 1);
    let result = &report.results[0];
    assert_eq!(result.symbol, "DIP");
    assert_eq!(result.category, OversoldCategory::Oversold);
    assert!((25.0..=40.0).contains(&result.latest_rsi));

    assert_eq!(report.total_symbols, 3);
    assert_eq!(report.evaluated, 3);
    assert_eq!(report.rejections.insufficient_history, 1);
    assert_eq!(report.rejections.rsi_out_of_range, 1);
    assert_eq!(report.failed, 0);
    assert!(report.find("DIP").is_some());
    assert!(report.find("FLAT").is_none());
}

#[tokio::test]
async fn test_full_band_accepts_every_series_with_history() {
    let prices = InMemoryPriceProvider::new()
        .with_series(series("DIP", &oversold_closes()))
        .with_series(series("FLAT", &constant_closes(260, 20.0)))
        .with_series(series("UP", &rising_closes(260)))
        .with_series(series("NEW", &rising_closes(30)));
    let report = scanner(Arc::new(prices))
        .scan(&ScanRequest::new(["DIP", "FLAT", "UP", "NEW"]).with_rsi_range(0.0, 100.0))
        .await
        .unwrap();

    let symbols: Vec<&str> = report.results.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["DIP", "FLAT", "UP"]);
    assert_eq!(report.rejections.insufficient_history, 1);
}

#[tokio::test]
async fn test_invalid_request_fails_before_any_fetch() {
    let prices = Arc::new(three_symbols());
    let scanner = scanner(prices.clone());

    let inverted_caps = ScanRequest::new(["DIP"]).with_market_cap_range(5.0e9, Some(1.0e9));
    assert!(matches!(
        scanner.scan(&inverted_caps).await,
        Err(ScanError::InvalidRequest(_))
    ));

    let inverted_rsi = ScanRequest::new(["DIP"]).with_rsi_range(40.0, 25.0);
    assert!(matches!(
        scanner.scan(&inverted_rsi).await,
        Err(ScanError::InvalidRequest(_))
    ));
    assert_eq!(prices.calls(), 0);
}

#[tokio::test]
async fn test_empty_universe() {
    let report = scanner(Arc::new(three_symbols()))
        .scan(&ScanRequest::new(Vec::<String>::new()))
        .await
        .unwrap();
    assert_eq!(report.outcome(), ScanOutcome::EmptyUniverse);
    assert!(report.is_empty());
    assert_eq!(report.average_rsi(), None);
}

#[tokio::test]
async fn test_duplicate_symbols_are_scanned_once() {
    let prices = Arc::new(three_symbols());
    let report = scanner(prices.clone())
        .without_cache()
        .scan(&ScanRequest::new(["DIP", "DIP", " DIP "]))
        .await
        .unwrap();
    assert_eq!(report.total_symbols, 1);
    assert_eq!(report.results.len(), 1);
    assert_eq!(prices.calls(), 1);
}

#[tokio::test]
async fn test_ranking_policies() {
    let prices = InMemoryPriceProvider::new()
        .with_series(series("MILD", &mildly_oversold_closes()))
        .with_series(series("DEEP", &deeply_oversold_closes()))
        .with_series(series("DIP", &oversold_closes()));
    let scanner = scanner(Arc::new(prices));
    let request = ScanRequest::new(["MILD", "DEEP", "DIP"]).with_rsi_range(0.0, 40.0);

    let by_rsi = scanner.scan(&request).await.unwrap();
    let symbols: Vec<&str> = by_rsi.results.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["DEEP", "DIP", "MILD"]);
    assert_eq!(by_rsi.ranking, RankingPolicy::RsiAscending);

    let by_score = scanner
        .scan(&request.with_ranking(RankingPolicy::BuyPotentialDescending))
        .await
        .unwrap();
    assert!(by_score
        .results
        .windows(2)
        .all(|w| w[0].buy_potential >= w[1].buy_potential));

    let counts = by_rsi.category_counts();
    assert_eq!(counts.get(&OversoldCategory::SuperOversold), Some(&1));
    assert_eq!(by_rsi.by_category(OversoldCategory::Oversold).len(), 1);
}

#[tokio::test]
async fn test_market_cap_filter() {
    let prices = InMemoryPriceProvider::new()
        .with_series(series("BIG", &oversold_closes()))
        .with_series(series("SMALL", &oversold_closes()))
        .with_series(series("ANON", &oversold_closes()));
    let metadata = StaticMetadataProvider::new()
        .with_entry("BIG", SymbolMetadata::new(2.0e11, "Technology"))
        .with_entry("SMALL", SymbolMetadata::new(3.0e8, "Energy"));
    let scanner = UniverseScanner::new(
        Arc::new(prices),
        Arc::new(metadata),
        ScannerConfig::default(),
    );
    let symbols = ["BIG", "SMALL", "ANON"];

    let unrestricted = scanner.scan(&ScanRequest::new(symbols)).await.unwrap();
    assert_eq!(unrestricted.results.len(), 3);
    let anon = unrestricted.find("ANON").unwrap();
    assert_eq!(anon.market_cap, None);
    assert_eq!(anon.sector, None);

    let large_only = scanner
        .scan(&ScanRequest::new(symbols).with_market_cap_range(1.0e10, None))
        .await
        .unwrap();
    assert_eq!(large_only.results.len(), 1);
    assert_eq!(large_only.results[0].symbol, "BIG");
    assert_eq!(large_only.filtered_by_market_cap, 2);

    let capped = scanner
        .scan(&ScanRequest::new(symbols).with_market_cap_range(1.0e8, Some(3.0e8)))
        .await
        .unwrap();
    assert_eq!(capped.results.len(), 1);
    assert_eq!(capped.results[0].symbol, "SMALL");

    let none = scanner
        .scan(&ScanRequest::new(symbols).with_market_cap_range(1.0e12, None))
        .await
        .unwrap();
    assert_eq!(none.outcome(), ScanOutcome::NoMatches);
}

#[tokio::test]
async fn test_repeated_scans_are_idempotent_and_cached() {
    let prices = Arc::new(three_symbols());
    let scanner = scanner(prices.clone());
    let request = ScanRequest::new(["DIP", "FLAT", "NEW"]);

    let first = scanner.scan(&request).await.unwrap();
    let second = scanner.scan(&request).await.unwrap();

    assert_eq!(first.results.len(), second.results.len());
    assert_eq!(first.results[0].latest_rsi, second.results[0].latest_rsi);
    assert_eq!(first.results[0].buy_potential, second.results[0].buy_potential);
    assert_eq!(first.rejections, second.rejections);
    // NEW is rejected before analysis and so never cached.
    assert_eq!(prices.calls(), 4);
    assert_eq!(scanner.cache().unwrap().stats().active_entries, 2);
}

#[tokio::test]
async fn test_changing_band_reuses_cached_analysis() {
    let prices = Arc::new(three_symbols());
    let scanner = scanner(prices.clone());

    let narrow = scanner
        .scan(&ScanRequest::new(["DIP", "FLAT"]))
        .await
        .unwrap();
    let wide = scanner
        .scan(&ScanRequest::new(["DIP", "FLAT"]).with_rsi_range(0.0, 100.0))
        .await
        .unwrap();

    assert_eq!(narrow.results.len(), 1);
    assert_eq!(wide.results.len(), 2);
    assert_eq!(prices.calls(), 2);
}

#[tokio::test]
async fn test_total_outage_reports_unreachable_source() {
    let prices = InMemoryPriceProvider::new()
        .with_failure("AAA", ProviderError::Unavailable("connection refused".to_string()))
        .with_failure("BBB", ProviderError::Unavailable("connection refused".to_string()));
    let prices = Arc::new(prices);
    let scanner = UniverseScanner::new(
        prices.clone(),
        Arc::new(NoMetadata),
        ScannerConfig {
            fetch: fast_policy(),
            ..ScannerConfig::default()
        },
    );

    let report = scanner.scan(&ScanRequest::new(["AAA", "BBB"])).await.unwrap();
    assert!(report.is_empty());
    assert_eq!(report.failed, 2);
    assert!(!report.source_reachable);
    assert_eq!(report.outcome(), ScanOutcome::SourceUnreachable);
    // Transient failures are retried: 1 attempt + 2 retries per symbol.
    assert_eq!(prices.calls(), 6);
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let prices = Arc::new(three_symbols());
    let scanner = UniverseScanner::new(
        prices.clone(),
        Arc::new(NoMetadata),
        ScannerConfig {
            fetch: fast_policy(),
            ..ScannerConfig::default()
        },
    );

    let report = scanner
        .scan(&ScanRequest::new(["DIP", "GONE"]))
        .await
        .unwrap();
    assert_eq!(report.failed, 1);
    assert!(report.source_reachable);
    assert_eq!(report.outcome(), ScanOutcome::Matches);
    assert_eq!(prices.calls(), 2);
}

#[tokio::test]
async fn test_slow_symbol_times_out() {
    let prices = InMemoryPriceProvider::new()
        .with_series(series("SLOW", &oversold_closes()))
        .with_delay(Duration::from_millis(300));
    let scanner = UniverseScanner::new(
        Arc::new(prices),
        Arc::new(NoMetadata),
        ScannerConfig {
            fetch: FetchPolicy {
                retry_attempts: 0,
                ..fast_policy()
            },
            ..ScannerConfig::default()
        },
    );

    let report = scanner.scan(&ScanRequest::new(["SLOW"])).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.outcome(), ScanOutcome::SourceUnreachable);
}

#[tokio::test]
async fn test_liquidity_prefilter_keeps_most_traded() {
    let prices = InMemoryPriceProvider::new()
        .with_series(series_with_volume("HEAVY", &oversold_closes(), 5.0e6))
        .with_series(series_with_volume("MID", &oversold_closes(), 2.0e6))
        .with_series(series_with_volume("THIN", &oversold_closes(), 1.0e4));
    let scanner = UniverseScanner::new(
        Arc::new(prices),
        Arc::new(NoMetadata),
        ScannerConfig {
            liquidity: Some(LiquidityConfig {
                top_n: 2,
                lookback_days: 30,
            }),
            ..ScannerConfig::default()
        },
    );

    let events: Mutex<Vec<ScanProgress>> = Mutex::new(Vec::new());
    let sink = |p: &ScanProgress| events.lock().unwrap().push(p.clone());
    let report = scanner
        .scan_with(
            &ScanRequest::new(["THIN", "MID", "HEAVY"]),
            &sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.below_liquidity_cut, 1);
    assert_eq!(report.evaluated, 2);
    assert!(report.find("THIN").is_none());
    assert!(report.find("HEAVY").is_some());

    let events = events.into_inner().unwrap();
    let liquidity = events.iter().filter(|e| e.stage == ScanStage::Liquidity).count();
    let evaluation = events.iter().filter(|e| e.stage == ScanStage::Evaluation).count();
    assert_eq!(liquidity, 3);
    assert_eq!(evaluation, 2);
}

#[tokio::test]
async fn test_total_outage_with_liquidity_prefilter_reports_unreachable_source() {
    let outage = || ProviderError::Unavailable("connection refused".to_string());
    let prices = InMemoryPriceProvider::new()
        .with_failure("AAA", outage())
        .with_failure("BBB", outage())
        .with_failure("CCC", outage());
    let scanner = UniverseScanner::new(
        Arc::new(prices),
        Arc::new(NoMetadata),
        ScannerConfig {
            liquidity: Some(LiquidityConfig {
                top_n: 2,
                lookback_days: 30,
            }),
            fetch: FetchPolicy {
                retry_attempts: 0,
                ..fast_policy()
            },
            ..ScannerConfig::default()
        },
    );

    let report = scanner
        .scan(&ScanRequest::new(["AAA", "BBB", "CCC"]))
        .await
        .unwrap();
    assert_eq!(report.evaluated, 0);
    assert_eq!(report.failed, 3);
    assert_eq!(report.below_liquidity_cut, 0);
    assert!(!report.source_reachable);
    assert_eq!(report.outcome(), ScanOutcome::SourceUnreachable);
}

#[tokio::test]
async fn test_shared_cache_still_enforces_minimum_history() {
    let prices = Arc::new(
        InMemoryPriceProvider::new().with_series(series("YOUNG", &rising_closes(80))),
    );
    let lenient = UniverseScanner::new(
        prices.clone(),
        Arc::new(NoMetadata),
        ScannerConfig {
            min_bars: 50,
            ..ScannerConfig::default()
        },
    );
    let strict = UniverseScanner::new(
        prices.clone(),
        Arc::new(NoMetadata),
        ScannerConfig {
            min_bars: 200,
            ..ScannerConfig::default()
        },
    )
    .with_cache(Arc::clone(lenient.cache().unwrap()));
    let request = ScanRequest::new(["YOUNG"]).with_rsi_range(0.0, 100.0);

    let first = lenient.scan(&request).await.unwrap();
    assert_eq!(first.results.len(), 1);

    let second = strict.scan(&request).await.unwrap();
    assert!(second.results.is_empty());
    assert_eq!(second.rejections.insufficient_history, 1);
    assert_eq!(prices.calls(), 1);
}

#[tokio::test]
async fn test_expired_cache_entries_are_pruned_between_scans() {
    let scanner = UniverseScanner::new(
        Arc::new(three_symbols()),
        Arc::new(NoMetadata),
        ScannerConfig {
            cache_ttl: Some(Duration::from_millis(100)),
            ..ScannerConfig::default()
        },
    );

    scanner.scan(&ScanRequest::new(["DIP", "FLAT"])).await.unwrap();
    assert_eq!(scanner.cache().unwrap().stats().total_entries, 2);

    tokio::time::sleep(Duration::from_millis(200)).await;
    scanner.scan(&ScanRequest::new(["DIP"])).await.unwrap();
    assert_eq!(scanner.cache().unwrap().stats().total_entries, 1);
}
