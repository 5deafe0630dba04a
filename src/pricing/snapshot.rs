// Read-only lookups the pricing engine works against
//
// The service layer fetches products and rules first, then hands the engine a
// snapshot. The engine never sees the database or the cache.

use crate::models::Product;
use crate::pricing::rule::PricingRule;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves product identifiers to catalog entries
pub trait ProductCatalog {
    fn lookup_product(&self, product_id: i64) -> Option<&Product>;
}

/// Supplies the rule set for one calculation
///
/// Implementations should return active rules; the engine orders them itself.
pub trait RuleSource {
    fn list_active_rules(&self) -> &[PricingRule];
}

/// Products fetched for one calculation, keyed by id
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: HashMap<i64, Product>,
}

impl CatalogSnapshot {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for CatalogSnapshot {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self {
            products: iter.into_iter().map(|product| (product.id, product)).collect(),
        }
    }
}

impl ProductCatalog for CatalogSnapshot {
    fn lookup_product(&self, product_id: i64) -> Option<&Product> {
        self.products.get(&product_id)
    }
}

/// Parsed rules shared between concurrent calculations
#[derive(Debug, Clone, Default)]
pub struct RuleSnapshot {
    rules: Arc<Vec<PricingRule>>,
}

impl RuleSnapshot {
    pub fn new(rules: Vec<PricingRule>) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RuleSource for RuleSnapshot {
    fn list_active_rules(&self) -> &[PricingRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product(id: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price: dec!(1.00),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_catalog_snapshot_lookup() {
        let catalog: CatalogSnapshot = vec![product(1), product(2)].into_iter().collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup_product(2).map(|p| p.id), Some(2));
        assert!(catalog.lookup_product(3).is_none());
    }

    #[test]
    fn test_rule_snapshot_clones_share_rules() {
        let snapshot = RuleSnapshot::new(Vec::new());
        let clone = snapshot.clone();

        assert!(clone.is_empty());
        assert!(Arc::ptr_eq(&snapshot.rules, &clone.rules));
    }
}
