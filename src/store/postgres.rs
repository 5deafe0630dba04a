use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{PricingRuleRecord, Product};
use crate::pricing::error::PricingResult;
use crate::store::PricingStore;

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgPricingStore {
    pool: PgPool,
}

impl PgPricingStore {
    /// Create a new PgPricingStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PricingStore for PgPricingStore {
    async fn list_products(&self) -> PricingResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, created_at, updated_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_product(&self, product_id: i64) -> PricingResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn find_products(&self, product_ids: &[i64]) -> PricingResult<Vec<Product>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn list_active_rules(&self) -> PricingResult<Vec<PricingRuleRecord>> {
        let rules = sqlx::query_as::<_, PricingRuleRecord>(
            r#"
            SELECT id, name, rule_type, condition_type, condition_value, discount_value,
                   is_active, priority, created_at, updated_at
            FROM pricing_rules
            WHERE is_active = true
            ORDER BY priority DESC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    async fn find_rule(&self, rule_id: i64) -> PricingResult<Option<PricingRuleRecord>> {
        let rule = sqlx::query_as::<_, PricingRuleRecord>(
            r#"
            SELECT id, name, rule_type, condition_type, condition_value, discount_value,
                   is_active, priority, created_at, updated_at
            FROM pricing_rules
            WHERE id = $1
            "#,
        )
        .bind(rule_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rule)
    }

    async fn ping(&self) -> PricingResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
