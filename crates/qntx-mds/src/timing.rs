//! Timed stage contexts
//!
//! Logs when a stage starts and how long it took once the guard drops.

use std::time::Instant;
use tracing::debug;

pub(crate) struct TimedContext {
    operation: &'static str,
    start: Instant,
}

impl TimedContext {
    pub(crate) fn new(operation: &'static str) -> Self {
        debug!("{} started", operation);
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for TimedContext {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        debug!(
            "{} took {:.3}ms",
            self.operation,
            elapsed.as_secs_f64() * 1000.0
        );
    }
}
