// Cart Pricing Module
//
// Turns stored products and pricing rules into a priced cart:
// - Rule model: typed conditions and discounts parsed from stored records
// - Engine: ordered, compounding application of rules to a running total
// - Rule cache: time-based cache of the parsed active rule set
// - Service: gathers snapshots for a cart and runs the engine

pub mod condition;
pub mod discount;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod rule;
pub mod rule_cache;
mod serde_helpers;
pub mod service;
pub mod snapshot;
pub mod types;

pub use engine::{
    AppliedRuleRecord, CalculationResult, CartLineRequest, CartPricingEngine, LineItemDetail,
};
pub use error::{PricingError, PricingResult};
pub use metrics::{MetricsSummary, PerformanceMetrics};
pub use rule::{Condition, Discount, PricingRule};
pub use rule_cache::RuleConfigurationStore;
pub use service::CartPricingService;
pub use snapshot::{CatalogSnapshot, ProductCatalog, RuleSnapshot, RuleSource};
pub use types::{BundleValueKind, ConditionType, RuleType};
