use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::{HandlerResult, Middleware, Next};
use crate::context::Context;

/// Middleware for collecting request statistics.
///
/// Tracks request counts, cumulative latency, and downstream chain failures.
/// All counters use atomic operations for thread-safe updates without locks.
///
/// This middleware is passive: it always invokes its continuation and never
/// alters the outcome, only observes and records.
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    error_count: AtomicUsize,
}

impl Default for MetricsMiddleware {
    fn default() -> Self {
        Self {
            request_count: AtomicUsize::new(0),
            total_latency_ns: AtomicU64::new(0),
            error_count: AtomicUsize::new(0),
        }
    }
}

impl MetricsMiddleware {
    /// Create a metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Calculate the average downstream latency
    ///
    /// Returns the mean time spent below this middleware across all
    /// requests, or zero if none have been processed yet.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Get the number of requests whose downstream chain returned an error
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }
}

/// Uses `Ordering::Relaxed` throughout: the counters are eventually
/// consistent and extremely low-cost to collect.
impl Middleware for MetricsMiddleware {
    fn handle(&self, ctx: &mut Context, next: Next<'_>) -> HandlerResult {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();
        let result = next(ctx);
        self.total_latency_ns
            .fetch_add(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
        if result.is_err() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        result
    }
}
