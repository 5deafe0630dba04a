// Product catalog and pricing rule storage
//
// Handlers and the pricing service talk to storage only through `PricingStore`,
// so the same code runs against PostgreSQL or the in-memory store.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPricingStore;
pub use postgres::PgPricingStore;

use crate::models::{PricingRuleRecord, Product};
use crate::pricing::error::PricingResult;
use async_trait::async_trait;

#[async_trait]
pub trait PricingStore: Send + Sync {
    /// All products, ordered by id
    async fn list_products(&self) -> PricingResult<Vec<Product>>;

    async fn find_product(&self, product_id: i64) -> PricingResult<Option<Product>>;

    /// Products for the given ids; unknown ids are simply absent
    async fn find_products(&self, product_ids: &[i64]) -> PricingResult<Vec<Product>>;

    /// Active rules, ordered by priority descending then id ascending
    async fn list_active_rules(&self) -> PricingResult<Vec<PricingRuleRecord>>;

    async fn find_rule(&self, rule_id: i64) -> PricingResult<Option<PricingRuleRecord>>;

    /// Cheap round trip used by the health check
    async fn ping(&self) -> PricingResult<()>;
}
