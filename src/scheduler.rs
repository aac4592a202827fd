//! Fixed-cadence repetition of the pipeline

use crate::config::ScheduleConfig;
use std::fmt::Display;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Pause after each run
    pub interval: Duration,
    /// Total wall-clock window in which runs may start
    pub duration: Duration,
    pub max_iterations: Option<u32>,
}

impl Schedule {
    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            duration: Duration::from_secs(config.duration_secs),
            max_iterations: config.max_iterations,
        }
    }
}

/// Invoke `job` repeatedly until the window closes or the iteration cap is hit.
///
/// Runs never overlap: each invocation completes before the pause starts.
/// A failed run is logged and the schedule continues. Returns the number of
/// runs performed.
pub async fn run_scheduled<F, Fut, E>(schedule: &Schedule, mut job: F) -> u32
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let deadline = Instant::now() + schedule.duration;
    let mut iterations = 0u32;

    while Instant::now() < deadline {
        if schedule.max_iterations.is_some_and(|max| iterations >= max) {
            break;
        }

        iterations += 1;
        info!(iteration = iterations, "Starting scheduled run");

        if let Err(e) = job(iterations).await {
            error!(iteration = iterations, error = %e, "Scheduled run failed");
        }

        if schedule.max_iterations.is_some_and(|max| iterations >= max) {
            break;
        }

        let now = Instant::now();
        if now < deadline {
            let pause = schedule.interval.min(deadline - now);
            info!(secs = pause.as_secs(), "Waiting for next run");
            tokio::time::sleep(pause).await;
        }
    }

    info!(iterations, "Schedule finished");
    iterations
}
