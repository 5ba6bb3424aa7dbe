//! Symbol universes.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::services::market_data::SymbolUniverse;

const POPULAR_US_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "TSLA", "AMD", "INTC", "ORCL",
    "IBM", "CSCO", "ADBE", "CRM", "NOW", "SNOW", "ZM", "TEAM", "OKTA", "DDOG",
    "JPM", "BAC", "WFC", "C", "GS", "MS", "BLK", "SCHW", "AXP", "V", "MA", "PYPL",
    "JNJ", "PFE", "MRK", "ABBV", "LLY", "ABT", "MDT", "BMY", "DHR", "UNH",
    "WMT", "KO", "PEP", "PG", "NKE", "MCD", "DIS", "CMCSA", "NFLX", "SBUX",
    "XOM", "CVX", "COP", "SLB", "HAL", "KMI", "OXY", "MPC", "PSX", "VLO",
    "BA", "CAT", "GE", "HON", "LMT", "MMM", "UNP", "UPS", "FDX", "CSX",
    "QCOM", "TXN", "AVGO", "INTU", "ADP", "FIS", "FISV", "CCI", "AMAT", "LRCX",
    "KLAC", "MU", "WDAY", "NET", "CRWD", "ZS", "PANW", "FTNT", "VRNS", "CHKP",
    "PLTR", "SQ", "ROKU", "SHOP", "ETSY", "SE", "AFRM", "U", "RIVN", "LCID",
];

/// Trims symbols, drops blanks and keeps the first occurrence of each.
pub fn dedupe_symbols<I, S>(symbols: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    symbols
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct StaticUniverse {
    symbols: Vec<String>,
}

impl StaticUniverse {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            symbols: dedupe_symbols(symbols),
        }
    }

    /// Large-cap US names across technology, finance, health, energy and industrials.
    pub fn popular_us() -> Self {
        Self::new(POPULAR_US_SYMBOLS.iter().copied())
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

#[async_trait]
impl SymbolUniverse for StaticUniverse {
    async fn list(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.symbols.clone())
    }
}
