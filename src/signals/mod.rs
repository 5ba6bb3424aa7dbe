//! Oversold classification, buy-potential scoring and the stock evaluator.

pub mod categories;
pub mod engine;
pub mod scoring;

pub use categories::*;
pub use engine::{EvaluatorConfig, StockEvaluator, MIN_BARS};
pub use scoring::*;
