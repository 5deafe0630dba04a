// Discount Calculator
//
// Computes the monetary discount of a rule whose condition holds. Amounts are
// pre-clamp: the engine caps them at the running total before subtracting.

use crate::pricing::engine::LineItemDetail;
use crate::pricing::rule::{BundleParams, BuyXGetYParams, Discount};
use crate::pricing::types::BundleValueKind;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

impl Discount {
    /// Discount amount for the cart snapshot at the given running total, never negative
    pub fn amount(&self, items: &[LineItemDetail], running_total: Decimal) -> Decimal {
        let amount = match self {
            Discount::Percentage(params) => {
                running_total.saturating_mul(params.percentage) / HUNDRED
            }
            Discount::Fixed(params) => params.amount.min(running_total),
            Discount::BuyXGetY(params) => buy_x_get_y_amount(params, items),
            Discount::Bundle(params) => bundle_amount(params, items),
            Discount::Unsupported(_) => Decimal::ZERO,
        };

        amount.max(Decimal::ZERO)
    }
}

fn buy_x_get_y_amount(params: &BuyXGetYParams, items: &[LineItemDetail]) -> Decimal {
    let Some(product_id) = params.product_id else {
        return Decimal::ZERO;
    };
    if params.buy_quantity == 0 {
        return Decimal::ZERO;
    }

    match items.iter().find(|item| item.product_id == product_id) {
        Some(item) => {
            let free_units = Decimal::from(item.quantity / params.buy_quantity)
                * Decimal::from(params.get_free_quantity);
            free_units.saturating_mul(item.unit_price)
        }
        None => Decimal::ZERO,
    }
}

fn bundle_amount(params: &BundleParams, items: &[LineItemDetail]) -> Decimal {
    let members: BTreeSet<i64> = params.products.iter().copied().collect();
    if members.is_empty() {
        return Decimal::ZERO;
    }

    let mut bundle_total = Decimal::ZERO;
    for product_id in &members {
        match items
            .iter()
            .find(|item| item.product_id == *product_id && item.quantity >= 1)
        {
            Some(item) => bundle_total = bundle_total.saturating_add(item.line_total),
            None => return Decimal::ZERO,
        }
    }

    match &params.kind {
        BundleValueKind::Percentage => bundle_total.saturating_mul(params.value) / HUNDRED,
        BundleValueKind::Fixed => params.value,
        BundleValueKind::Unsupported(_) => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::rule::{FixedParams, PercentageParams};
    use rust_decimal_macros::dec;

    fn line(product_id: i64, quantity: u32, unit_price: Decimal) -> LineItemDetail {
        LineItemDetail {
            product_id,
            product_name: format!("Product {}", product_id),
            quantity,
            unit_price,
            line_total: unit_price * Decimal::from(quantity),
        }
    }

    fn bundle(products: Vec<i64>, kind: BundleValueKind, value: Decimal) -> Discount {
        Discount::Bundle(BundleParams {
            products,
            kind,
            value,
        })
    }

    #[test]
    fn test_percentage_of_running_total() {
        let discount = Discount::Percentage(PercentageParams { percentage: dec!(10) });
        assert_eq!(discount.amount(&[], dec!(30.00)), dec!(3.00));
        assert_eq!(discount.amount(&[], dec!(27.00)), dec!(2.70));
    }

    #[test]
    fn test_negative_percentage_grants_nothing() {
        let discount = Discount::Percentage(PercentageParams { percentage: dec!(-10) });
        assert_eq!(discount.amount(&[], dec!(30.00)), Decimal::ZERO);
    }

    #[test]
    fn test_fixed_is_capped_at_running_total() {
        let discount = Discount::Fixed(FixedParams { amount: dec!(50) });
        assert_eq!(discount.amount(&[], dec!(30.00)), dec!(30.00));
        assert_eq!(discount.amount(&[], dec!(80.00)), dec!(50));
    }

    #[test]
    fn test_buy_two_get_one() {
        let discount = Discount::BuyXGetY(BuyXGetYParams {
            product_id: Some(1),
            buy_quantity: 2,
            get_free_quantity: 1,
        });
        let items = vec![line(1, 4, dec!(5.00))];

        // floor(4 / 2) * 1 = 2 free units at $5.00
        assert_eq!(discount.amount(&items, dec!(20.00)), dec!(10.00));
    }

    #[test]
    fn test_buy_x_get_y_rounds_down_partial_sets() {
        let discount = Discount::BuyXGetY(BuyXGetYParams {
            product_id: Some(1),
            buy_quantity: 3,
            get_free_quantity: 2,
        });
        let items = vec![line(1, 7, dec!(2.00))];

        // floor(7 / 3) * 2 = 4 free units
        assert_eq!(discount.amount(&items, dec!(14.00)), dec!(8.00));
    }

    #[test]
    fn test_buy_x_get_y_absent_product() {
        let discount = Discount::BuyXGetY(BuyXGetYParams {
            product_id: Some(9),
            ..BuyXGetYParams::default()
        });
        assert_eq!(discount.amount(&[line(1, 4, dec!(5))], dec!(20)), Decimal::ZERO);
    }

    #[test]
    fn test_buy_x_get_y_zero_buy_quantity() {
        let discount = Discount::BuyXGetY(BuyXGetYParams {
            product_id: Some(1),
            buy_quantity: 0,
            get_free_quantity: 1,
        });
        assert_eq!(discount.amount(&[line(1, 4, dec!(5))], dec!(20)), Decimal::ZERO);
    }

    #[test]
    fn test_buy_x_get_y_uses_first_matching_line() {
        let discount = Discount::BuyXGetY(BuyXGetYParams {
            product_id: Some(1),
            buy_quantity: 2,
            get_free_quantity: 1,
        });
        let items = vec![line(1, 2, dec!(5)), line(1, 10, dec!(5))];
        assert_eq!(discount.amount(&items, dec!(60)), dec!(5));
    }

    #[test]
    fn test_bundle_percentage_of_member_lines() {
        let discount = bundle(vec![1, 2], BundleValueKind::Percentage, dec!(15));
        let items = vec![
            line(1, 1, dec!(10.00)),
            line(2, 2, dec!(5.00)),
            line(3, 1, dec!(100.00)),
        ];

        // 15% of (10.00 + 10.00); product 3 is not part of the bundle
        assert_eq!(discount.amount(&items, dec!(120.00)), dec!(3.00));
    }

    #[test]
    fn test_bundle_fixed_value() {
        let discount = bundle(vec![1, 2], BundleValueKind::Fixed, dec!(4));
        let items = vec![line(1, 1, dec!(10)), line(2, 1, dec!(5))];
        assert_eq!(discount.amount(&items, dec!(15)), dec!(4));
    }

    #[test]
    fn test_incomplete_bundle_grants_nothing() {
        let discount = bundle(vec![1, 2], BundleValueKind::Percentage, dec!(15));
        assert_eq!(discount.amount(&[line(1, 3, dec!(10))], dec!(30)), Decimal::ZERO);
    }

    #[test]
    fn test_empty_bundle_grants_nothing() {
        let discount = bundle(vec![], BundleValueKind::Fixed, dec!(4));
        assert_eq!(discount.amount(&[line(1, 3, dec!(10))], dec!(30)), Decimal::ZERO);
    }

    #[test]
    fn test_bundle_members_counted_once() {
        let discount = bundle(vec![1, 1], BundleValueKind::Percentage, dec!(50));
        assert_eq!(discount.amount(&[line(1, 1, dec!(10))], dec!(10)), dec!(5));
    }

    #[test]
    fn test_bundle_unsupported_value_kind() {
        let discount = bundle(
            vec![1],
            BundleValueKind::Unsupported("per_unit".to_string()),
            dec!(4),
        );
        assert_eq!(discount.amount(&[line(1, 1, dec!(10))], dec!(10)), Decimal::ZERO);
    }

    #[test]
    fn test_unsupported_rule_type_grants_nothing() {
        let discount = Discount::Unsupported("loyalty_bonus".to_string());
        assert_eq!(discount.amount(&[line(1, 1, dec!(10))], dec!(10)), Decimal::ZERO);
    }
}
