//! Dipscan CLI
//!
//! Scans a symbol universe for oversold stocks and prints ranked results as
//! JSON lines on stdout.

use dipscan::config::{self, ScannerConfig};
use dipscan::core::UniverseScanner;
use dipscan::logging;
use dipscan::models::{ScanOutcome, ScanProgress};
use dipscan::services::{StaticUniverse, SymbolUniverse, YahooFinanceClient};
use dotenvy::dotenv;
use serde_json::json;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    info!("Starting dipscan");
    info!(environment = %env, "Environment");

    let scanner_config = ScannerConfig::from_env();
    let universe = StaticUniverse::popular_us().list().await?;
    let request = config::request_from_env(&universe);
    request.validate()?;

    let yahoo = Arc::new(YahooFinanceClient::new()?);
    let scanner = UniverseScanner::new(yahoo.clone(), yahoo, scanner_config);

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling scan");
            ctrl_c_token.cancel();
        }
    });

    let progress = |p: &ScanProgress| {
        info!(
            stage = ?p.stage,
            processed = p.processed,
            total = p.total,
            symbol = %p.symbol,
            "Progress {}/{} ({})",
            p.processed,
            p.total,
            p.symbol
        );
    };

    let report = scanner.scan_with(&request, &progress, &cancel).await?;

    match report.outcome() {
        ScanOutcome::SourceUnreachable => {
            warn!("Data source unreachable: no symbol could be fetched");
        }
        ScanOutcome::EmptyUniverse => warn!("No symbols to scan"),
        ScanOutcome::NoMatches => info!("No oversold stocks found in the requested range"),
        ScanOutcome::Matches => {
            for (category, count) in report.category_counts() {
                info!(category = category.label(), count, "{}: {}", category.label(), count);
            }
        }
    }

    for result in &report.results {
        let line = json!({
            "symbol": result.symbol,
            "as_of": result.as_of,
            "price": result.latest_price,
            "rsi": result.latest_rsi,
            "ema_50": result.latest_ema_short,
            "ema_200": result.latest_ema_long,
            "volume_ratio": result.volume_ratio,
            "market_cap": result.market_cap,
            "sector": result.sector,
            "category": result.category.label(),
            "buy_potential": result.buy_potential,
        });
        println!("{}", line);
    }

    info!("{}", report.summary());
    Ok(())
}
