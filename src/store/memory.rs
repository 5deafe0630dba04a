use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{PricingRuleRecord, Product};
use crate::pricing::error::PricingResult;
use crate::store::PricingStore;

/// In-memory store for tests and local runs without a database
#[derive(Default)]
pub struct InMemoryPricingStore {
    products: RwLock<BTreeMap<i64, Product>>,
    rules: RwLock<BTreeMap<i64, PricingRuleRecord>>,
}

impl InMemoryPricingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product
    pub async fn upsert_product(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    /// Insert or replace a pricing rule
    pub async fn upsert_rule(&self, rule: PricingRuleRecord) {
        self.rules.write().await.insert(rule.id, rule);
    }
}

#[async_trait]
impl PricingStore for InMemoryPricingStore {
    async fn list_products(&self) -> PricingResult<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn find_product(&self, product_id: i64) -> PricingResult<Option<Product>> {
        Ok(self.products.read().await.get(&product_id).cloned())
    }

    async fn find_products(&self, product_ids: &[i64]) -> PricingResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|product| product_ids.contains(&product.id))
            .cloned()
            .collect())
    }

    async fn list_active_rules(&self) -> PricingResult<Vec<PricingRuleRecord>> {
        let mut rules: Vec<PricingRuleRecord> = self
            .rules
            .read()
            .await
            .values()
            .filter(|rule| rule.is_active)
            .cloned()
            .collect();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        Ok(rules)
    }

    async fn find_rule(&self, rule_id: i64) -> PricingResult<Option<PricingRuleRecord>> {
        Ok(self.rules.read().await.get(&rule_id).cloned())
    }

    async fn ping(&self) -> PricingResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn rule(id: i64, priority: i32, is_active: bool) -> PricingRuleRecord {
        PricingRuleRecord {
            id,
            name: format!("rule {}", id),
            rule_type: "fixed_discount".to_string(),
            condition_type: "min_total".to_string(),
            condition_value: json!({}),
            discount_value: json!({"amount": 1}),
            is_active,
            priority,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_active_rules_filtered_and_ordered() {
        let store = InMemoryPricingStore::new();
        store.upsert_rule(rule(1, 0, true)).await;
        store.upsert_rule(rule(2, 5, true)).await;
        store.upsert_rule(rule(3, 9, false)).await;
        store.upsert_rule(rule(4, 0, true)).await;

        let ids: Vec<i64> = store
            .list_active_rules()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();

        assert_eq!(ids, vec![2, 1, 4]);
        assert!(store.find_rule(3).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_products_ignores_unknown_ids() {
        let store = InMemoryPricingStore::new();
        store
            .upsert_product(Product {
                id: 1,
                name: "Stapler".to_string(),
                price: dec!(8.00),
                description: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await;

        let products = store.find_products(&[1, 2]).await.unwrap();
        assert_eq!(products.len(), 1);
        assert!(store.find_product(2).await.unwrap().is_none());
    }
}
