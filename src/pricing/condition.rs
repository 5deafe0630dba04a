// Condition Evaluator
//
// Decides whether a rule's trigger condition holds for the resolved line items
// and the running total at that point in the rule sequence.

use crate::pricing::engine::LineItemDetail;
use crate::pricing::rule::Condition;
use rust_decimal::Decimal;

impl Condition {
    /// Check the condition against the cart snapshot and current running total
    pub fn is_satisfied(&self, items: &[LineItemDetail], running_total: Decimal) -> bool {
        match self {
            Condition::MinTotal(params) => match params.min_amount {
                Some(min_amount) => running_total >= min_amount,
                None => false,
            },
            Condition::MinQuantity(params) => match params.min_quantity {
                Some(min_quantity) => {
                    let total_quantity: u64 =
                        items.iter().map(|item| u64::from(item.quantity)).sum();
                    total_quantity >= u64::from(min_quantity)
                }
                None => false,
            },
            Condition::ProductBased(params) => match (params.product_id, params.min_quantity) {
                (Some(product_id), Some(min_quantity)) => items
                    .iter()
                    .any(|item| item.product_id == product_id && item.quantity >= min_quantity),
                _ => false,
            },
            Condition::Unsupported(_) => false,
        }
    }
}
