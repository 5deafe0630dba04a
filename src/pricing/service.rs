// Cart Pricing Service
//
// Gathers the product and rule snapshots for a cart, then runs the engine.

use crate::pricing::{
    engine::{CalculationResult, CartLineRequest, CartPricingEngine},
    error::PricingResult,
    metrics::PerformanceMetrics,
    rule_cache::RuleConfigurationStore,
    snapshot::CatalogSnapshot,
};
use crate::store::PricingStore;
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct CartPricingService {
    store: Arc<dyn PricingStore>,
    rule_store: Arc<RuleConfigurationStore>,
    metrics: PerformanceMetrics,
}

impl CartPricingService {
    pub fn new(
        store: Arc<dyn PricingStore>,
        rule_store: Arc<RuleConfigurationStore>,
        metrics: PerformanceMetrics,
    ) -> Self {
        Self {
            store,
            rule_store,
            metrics,
        }
    }

    /// Price a cart against current products and the cached rule set
    ///
    /// Only storage failures are errors. Unknown products are dropped by the engine.
    pub async fn calculate_cart(&self, cart: &[CartLineRequest]) -> PricingResult<CalculationResult> {
        let product_ids: Vec<i64> = cart
            .iter()
            .map(|line| line.product_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let catalog: CatalogSnapshot = self
            .store
            .find_products(&product_ids)
            .await?
            .into_iter()
            .collect();
        let rules = self.rule_store.get_active_rules().await?;

        let result = {
            let _timer = self.metrics.start_pricing_calculation();
            CartPricingEngine::new(&catalog, &rules).calculate(cart)
        };

        self.metrics
            .record_outcome(result.applied_rules.len(), result.skipped_lines);

        if result.skipped_lines > 0 {
            tracing::warn!(
                "Cart had {} line(s) for unknown products; priced without them",
                result.skipped_lines
            );
        }

        tracing::info!(
            "Priced cart: {} lines, base {}, final {}, {} rule(s) applied",
            result.items.len(),
            result.base_total,
            result.final_total,
            result.applied_rules.len()
        );

        Ok(result)
    }
}
