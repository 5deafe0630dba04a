// Rule Configuration Store
//
// Loads active pricing rules through the store, parses them once, and keeps the
// parsed set behind a time-based cache. A zero TTL reloads on every request.

use crate::pricing::{
    error::PricingResult, metrics::PerformanceMetrics, rule::PricingRule,
    snapshot::RuleSnapshot,
};
use crate::store::PricingStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default time-to-live for the cached rule set (60 seconds)
pub const DEFAULT_RULE_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
struct RuleCache {
    rules: RuleSnapshot,
    last_updated: Option<Instant>,
}

impl RuleCache {
    fn is_stale(&self, ttl: Duration) -> bool {
        match self.last_updated {
            Some(last_update) => ttl.is_zero() || last_update.elapsed() > ttl,
            None => true,
        }
    }
}

/// Rule Configuration Store
///
/// Shared by all requests. Calculations receive a `RuleSnapshot` and keep using
/// it even if the cache is refreshed underneath them.
pub struct RuleConfigurationStore {
    store: Arc<dyn PricingStore>,
    cache: RwLock<RuleCache>,
    cache_ttl: Duration,
    metrics: PerformanceMetrics,
}

impl RuleConfigurationStore {
    pub fn new(store: Arc<dyn PricingStore>, metrics: PerformanceMetrics) -> Self {
        Self::with_ttl(store, metrics, DEFAULT_RULE_CACHE_TTL)
    }

    pub fn with_ttl(
        store: Arc<dyn PricingStore>,
        metrics: PerformanceMetrics,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache: RwLock::new(RuleCache::default()),
            cache_ttl,
            metrics,
        }
    }

    /// Load and parse active rules straight from the store
    pub async fn load_active_rules(&self) -> PricingResult<RuleSnapshot> {
        let records = self.store.list_active_rules().await?;
        let rules: Vec<PricingRule> = records.iter().map(PricingRule::from_record).collect();
        tracing::debug!("Loaded {} active pricing rules", rules.len());
        Ok(RuleSnapshot::new(rules))
    }

    /// Get active rules with caching
    ///
    /// Returns the cached snapshot if fresh, otherwise reloads from the store.
    pub async fn get_active_rules(&self) -> PricingResult<RuleSnapshot> {
        // Fast path under the read lock
        {
            let cache = self.cache.read().await;
            if !cache.is_stale(self.cache_ttl) {
                self.metrics.record_cache_hit();
                return Ok(cache.rules.clone());
            }
        }

        let mut cache = self.cache.write().await;

        // Another request may have refreshed while we waited for the write lock
        if !self.cache_ttl.is_zero() && !cache.is_stale(self.cache_ttl) {
            self.metrics.record_cache_hit();
            return Ok(cache.rules.clone());
        }

        self.metrics.record_cache_miss();
        let rules = self.load_active_rules().await?;
        cache.rules = rules.clone();
        cache.last_updated = Some(Instant::now());

        Ok(rules)
    }
}
