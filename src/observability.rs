//! Logging setup and run counters

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Counters accumulated across pipeline runs
#[derive(Debug, Default)]
pub struct Metrics {
    runs: AtomicU64,
    runs_without_metadata: AtomicU64,
    images_saved: AtomicU64,
    images_failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_started(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "runs", "Metric incremented");
    }

    pub fn metadata_unavailable(&self) {
        self.runs_without_metadata.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "runs_without_metadata", "Metric incremented");
    }

    pub fn record_batch(&self, successful: usize, total: usize) {
        self.images_saved.fetch_add(successful as u64, Ordering::Relaxed);
        self.images_failed
            .fetch_add(total.saturating_sub(successful) as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            runs_without_metadata: self.runs_without_metadata.load(Ordering::Relaxed),
            images_saved: self.images_saved.load(Ordering::Relaxed),
            images_failed: self.images_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub runs: u64,
    pub runs_without_metadata: u64,
    pub images_saved: u64,
    pub images_failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_accumulate() {
        let metrics = Metrics::new();
        metrics.run_started();
        metrics.record_batch(2, 3);
        metrics.run_started();
        metrics.metadata_unavailable();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                runs: 2,
                runs_without_metadata: 1,
                images_saved: 2,
                images_failed: 1,
            }
        );
    }
}
