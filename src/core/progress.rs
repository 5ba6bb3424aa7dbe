use crate::models::scan::ScanProgress;

/// Observer of scan progress. Must not block.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &ScanProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(&ScanProgress) + Send + Sync,
{
    fn report(&self, progress: &ScanProgress) {
        self(progress)
    }
}

pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _progress: &ScanProgress) {}
}
