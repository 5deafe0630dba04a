// Performance Metrics for the pricing subsystem
//
// Tracks calculation times, rule cache hit rates, and how often carts carry
// lines the catalog cannot resolve.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use utoipa::ToSchema;

/// Performance threshold for slow operations (100ms)
const SLOW_OPERATION_THRESHOLD_MS: u64 = 100;

/// Performance metrics for cart pricing
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    // Rule cache
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,

    // Calculations
    pricing_calculations: AtomicU64,
    total_pricing_time_us: AtomicU64,
    slow_pricing_calculations: AtomicU64,

    // Outcomes
    rules_applied: AtomicU64,
    skipped_lines: AtomicU64,
}

impl PerformanceMetrics {
    /// Create a new PerformanceMetrics instance
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub fn record_cache_hit(&self) {
        self.inner.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.inner.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Get cache hit rate (0.0 to 1.0)
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.inner.cache_hits.load(Ordering::Relaxed);
        let misses = self.inner.cache_misses.load(Ordering::Relaxed);
        let total = hits + misses;

        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Start timing a pricing calculation; recorded when the timer drops
    pub fn start_pricing_calculation(&self) -> OperationTimer {
        OperationTimer {
            start: Instant::now(),
            metrics: self.clone(),
        }
    }

    /// Record what a finished calculation did
    pub fn record_outcome(&self, rules_applied: usize, skipped_lines: usize) {
        self.inner
            .rules_applied
            .fetch_add(rules_applied as u64, Ordering::Relaxed);
        self.inner
            .skipped_lines
            .fetch_add(skipped_lines as u64, Ordering::Relaxed);
    }

    fn record_pricing_calculation(&self, duration: Duration) {
        self.inner.pricing_calculations.fetch_add(1, Ordering::Relaxed);
        self.inner
            .total_pricing_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        if duration.as_millis() as u64 > SLOW_OPERATION_THRESHOLD_MS {
            self.inner
                .slow_pricing_calculations
                .fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Slow pricing calculation: {}ms", duration.as_millis());
        }
    }

    /// Get average pricing calculation time in milliseconds
    pub fn avg_pricing_time_ms(&self) -> f64 {
        let count = self.inner.pricing_calculations.load(Ordering::Relaxed);
        let total_us = self.inner.total_pricing_time_us.load(Ordering::Relaxed);

        if count == 0 {
            0.0
        } else {
            (total_us as f64 / count as f64) / 1000.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            cache_hit_rate: self.cache_hit_rate(),
            cache_hits: self.inner.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.inner.cache_misses.load(Ordering::Relaxed),
            pricing_calculations: self.inner.pricing_calculations.load(Ordering::Relaxed),
            avg_pricing_time_ms: self.avg_pricing_time_ms(),
            slow_pricing_calculations: self
                .inner
                .slow_pricing_calculations
                .load(Ordering::Relaxed),
            rules_applied: self.inner.rules_applied.load(Ordering::Relaxed),
            skipped_lines: self.inner.skipped_lines.load(Ordering::Relaxed),
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        let summary = self.summary();
        tracing::info!(
            "Pricing metrics: cache {:.1}% hit rate ({} hits, {} misses), \
             {} calculations, avg {:.2}ms, {} slow, {} rules applied, {} lines skipped",
            summary.cache_hit_rate * 100.0,
            summary.cache_hits,
            summary.cache_misses,
            summary.pricing_calculations,
            summary.avg_pricing_time_ms,
            summary.slow_pricing_calculations,
            summary.rules_applied,
            summary.skipped_lines,
        );
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer for tracking calculation duration
pub struct OperationTimer {
    start: Instant,
    metrics: PerformanceMetrics,
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        self.metrics
            .record_pricing_calculation(self.start.elapsed());
    }
}

/// Summary of performance metrics
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetricsSummary {
    pub cache_hit_rate: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub pricing_calculations: u64,
    pub avg_pricing_time_ms: f64,
    pub slow_pricing_calculations: u64,
    pub rules_applied: u64,
    pub skipped_lines: u64,
}
