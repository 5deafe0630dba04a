// Cart Pricing Engine
//
// Totals the cart, then folds the ordered rule list over the running total.
// Pure and synchronous: the only inputs are the two read-only snapshots.

use crate::pricing::rule::PricingRule;
use crate::pricing::snapshot::{ProductCatalog, RuleSource};
use rust_decimal::Decimal;

/// One requested cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLineRequest {
    pub product_id: i64,
    pub quantity: u32,
}

/// A cart line resolved against the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemDetail {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// A rule that produced a positive discount
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRuleRecord {
    pub rule_name: String,
    pub rule_type: String,
    pub discount_amount: Decimal,
}

/// Result of pricing a cart
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub base_total: Decimal,
    pub final_total: Decimal,
    pub total_discount: Decimal,
    pub items: Vec<LineItemDetail>,
    pub applied_rules: Vec<AppliedRuleRecord>,
    /// Requested lines dropped because the product could not be resolved
    pub skipped_lines: usize,
}

/// Cart Pricing Engine
///
/// Borrows a catalog and a rule source for the duration of a calculation.
pub struct CartPricingEngine<'a, C, R> {
    catalog: &'a C,
    rules: &'a R,
}

impl<'a, C, R> CartPricingEngine<'a, C, R>
where
    C: ProductCatalog,
    R: RuleSource,
{
    pub fn new(catalog: &'a C, rules: &'a R) -> Self {
        Self { catalog, rules }
    }

    /// Price a cart
    ///
    /// 1. Resolve lines against the catalog, dropping unknown products
    /// 2. Order active rules by priority (descending), then id (ascending)
    /// 3. Fold the rules over the running total, starting from the base total
    /// 4. Assemble the breakdown
    pub fn calculate(&self, cart: &[CartLineRequest]) -> CalculationResult {
        let items = self.resolve_line_items(cart);
        let skipped_lines = cart.len() - items.len();
        let base_total: Decimal = items.iter().map(|item| item.line_total).sum();

        let rules = ordered_rules(self.rules.list_active_rules());
        let (final_total, applied_rules) = rules.iter().fold(
            (base_total, Vec::new()),
            |(running_total, mut applied), rule| {
                let discount = rule_discount(rule, &items, running_total);
                if discount > Decimal::ZERO {
                    tracing::debug!(
                        "Rule {} ('{}') applied: -{}",
                        rule.id,
                        rule.name,
                        discount
                    );
                    applied.push(AppliedRuleRecord {
                        rule_name: rule.name.clone(),
                        rule_type: rule.discount.type_name().to_string(),
                        discount_amount: discount,
                    });
                }
                (running_total - discount, applied)
            },
        );

        CalculationResult {
            base_total,
            final_total,
            total_discount: base_total - final_total,
            items,
            applied_rules,
            skipped_lines,
        }
    }

    fn resolve_line_items(&self, cart: &[CartLineRequest]) -> Vec<LineItemDetail> {
        cart.iter()
            .filter_map(|line| match self.catalog.lookup_product(line.product_id) {
                Some(product) => Some(LineItemDetail {
                    product_id: product.id,
                    product_name: product.name.clone(),
                    quantity: line.quantity,
                    unit_price: product.price,
                    line_total: product.price.saturating_mul(Decimal::from(line.quantity)),
                }),
                None => {
                    tracing::debug!(
                        "Skipping cart line for unknown product {}",
                        line.product_id
                    );
                    None
                }
            })
            .collect()
    }
}

/// Active rules, highest priority first, ties broken by id
pub fn ordered_rules(rules: &[PricingRule]) -> Vec<&PricingRule> {
    let mut ordered: Vec<&PricingRule> = rules.iter().filter(|rule| rule.is_active).collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
    ordered
}

/// Discount one rule contributes at the given running total, clamped to `[0, running_total]`
pub fn rule_discount(rule: &PricingRule, items: &[LineItemDetail], running_total: Decimal) -> Decimal {
    if !rule.condition.is_satisfied(items, running_total) {
        return Decimal::ZERO;
    }

    rule.discount
        .amount(items, running_total)
        .min(running_total)
        .max(Decimal::ZERO)
}
