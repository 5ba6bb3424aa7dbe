//! Oversold-stock screening over daily price history.
//!
//! The crate computes RSI, EMA, MACD and Bollinger Bands for each symbol of a
//! universe, classifies the latest RSI into an oversold category, scores a
//! composite "buy potential" and ranks the survivors of a scan.

pub mod cache;
pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod services;
pub mod signals;

pub use crate::core::scanner::UniverseScanner;
pub use error::{ProviderError, Rejection, ScanError, SeriesError};
pub use models::{EvaluationResult, PriceBar, PriceSeries, ScanReport, ScanRequest};
