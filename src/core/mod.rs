//! Scan orchestration: per-symbol pipeline, liquidity pre-ranking and the
//! sequential and concurrent evaluation models.

pub mod liquidity;
pub mod pipeline;
pub mod progress;
pub mod runtime;
pub mod scanner;

pub use pipeline::{Pipeline, SymbolOutcome};
pub use progress::{NoopProgress, ProgressSink};
pub use scanner::{rank_results, UniverseScanner};
