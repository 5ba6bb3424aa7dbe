//! Interfaces to the external data collaborators of a scan.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::models::evaluation::SymbolMetadata;
use crate::models::price::PriceSeries;

/// Bar interval requested from a price provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    Daily,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
        }
    }
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Bars covering roughly the last `lookback_days`, ascending by date.
    async fn fetch(
        &self,
        symbol: &str,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<PriceSeries, ProviderError>;
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn lookup(&self, symbol: &str) -> Result<SymbolMetadata, ProviderError>;
}

/// Supplies the ordered list of symbols to scan.
#[async_trait]
pub trait SymbolUniverse: Send + Sync {
    async fn list(&self) -> Result<Vec<String>, ProviderError>;
}

/// Metadata provider for callers without a metadata source.
pub struct NoMetadata;

#[async_trait]
impl MetadataProvider for NoMetadata {
    async fn lookup(&self, _symbol: &str) -> Result<SymbolMetadata, ProviderError> {
        Ok(SymbolMetadata::unknown())
    }
}
