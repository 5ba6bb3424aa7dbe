//! Sequential and batched-concurrent evaluation of a symbol list.

use std::collections::HashSet;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::core::pipeline::{Pipeline, SymbolOutcome};
use crate::core::progress::ProgressSink;
use crate::error::{ProviderError, ScanError};
use crate::models::scan::{ScanProgress, ScanStage};

fn report(progress: &dyn ProgressSink, processed: usize, total: usize, symbol: &str) {
    progress.report(&ScanProgress {
        stage: ScanStage::Evaluation,
        processed,
        total,
        symbol: symbol.to_string(),
    });
}

/// Evaluates symbols one at a time in list order.
pub async fn run_sequential(
    pipeline: &Pipeline,
    symbols: &[String],
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<Vec<(String, SymbolOutcome)>, ScanError> {
    let total = symbols.len();
    let mut outcomes = Vec::with_capacity(total);

    for (i, symbol) in symbols.iter().enumerate() {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ScanError::Cancelled),
            outcome = pipeline.run(symbol) => outcome,
        };
        report(progress, i + 1, total, symbol);
        outcomes.push((symbol.clone(), outcome));
    }

    Ok(outcomes)
}

/// Splits symbols into batches of `batch_size`, one task per batch.
///
/// Each task owns its batch and sends outcomes over a bounded channel; the
/// caller drains the channel until every task has finished. Arrival order
/// is not preserved.
pub async fn run_concurrent(
    pipeline: &Pipeline,
    symbols: &[String],
    batch_size: usize,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<Vec<(String, SymbolOutcome)>, ScanError> {
    let total = symbols.len();
    let batch_size = batch_size.max(1);
    let (tx, mut rx) = mpsc::channel::<(String, SymbolOutcome)>(batch_size * 2);
    let mut workers = JoinSet::new();

    for (batch, chunk) in symbols.chunks(batch_size).enumerate() {
        let pipeline = pipeline.clone();
        let chunk = chunk.to_vec();
        let tx = tx.clone();
        let cancel = cancel.child_token();
        workers.spawn(async move {
            debug!(batch, size = chunk.len(), "Runtime: batch {} started", batch);
            for symbol in chunk {
                if cancel.is_cancelled() {
                    return;
                }
                let outcome = pipeline.run(&symbol).await;
                if tx.send((symbol, outcome)).await.is_err() {
                    return;
                }
            }
        });
    }
    drop(tx);

    info!(
        batches = workers.len(),
        batch_size,
        "Runtime: {} symbols across {} batches",
        total,
        workers.len()
    );

    let mut outcomes = Vec::with_capacity(total);
    let mut seen = HashSet::with_capacity(total);
    loop {
        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                workers.abort_all();
                return Err(ScanError::Cancelled);
            }
            received = rx.recv() => received,
        };
        let Some((symbol, outcome)) = received else {
            break;
        };
        report(progress, outcomes.len() + 1, total, &symbol);
        seen.insert(symbol.clone());
        outcomes.push((symbol, outcome));
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Runtime: batch worker failed");
        }
    }

    // Symbols a crashed worker never reached count as failures.
    for symbol in symbols {
        if !seen.contains(symbol) {
            outcomes.push((
                symbol.clone(),
                SymbolOutcome::Failed(ProviderError::Unavailable(
                    "batch worker stopped before evaluating symbol".to_string(),
                )),
            ));
        }
    }

    Ok(outcomes)
}
