// Domain type definitions for the pricing engine
// Names the rule and condition kinds a stored pricing rule can carry

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of discount a pricing rule grants
///
/// Stored as snake_case text in the `pricing_rules.rule_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Percentage off the running total (e.g., 10 = 10% off)
    PercentageDiscount,

    /// Fixed amount off the running total
    FixedDiscount,

    /// Buy X units of a product, get Y units free
    BuyXGetY,

    /// Discount on a set of products bought together
    BundleDiscount,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::PercentageDiscount => "percentage_discount",
            RuleType::FixedDiscount => "fixed_discount",
            RuleType::BuyXGetY => "buy_x_get_y",
            RuleType::BundleDiscount => "bundle_discount",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage_discount" => Ok(RuleType::PercentageDiscount),
            "fixed_discount" => Ok(RuleType::FixedDiscount),
            "buy_x_get_y" => Ok(RuleType::BuyXGetY),
            "bundle_discount" => Ok(RuleType::BundleDiscount),
            _ => Err(format!("Invalid rule type: {}", s)),
        }
    }
}

/// Kind of trigger condition gating a pricing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    /// Running total must reach a minimum amount
    MinTotal,

    /// Total number of units in the cart must reach a minimum
    MinQuantity,

    /// A specific product must be in the cart with a minimum quantity
    ProductBased,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::MinTotal => "min_total",
            ConditionType::MinQuantity => "min_quantity",
            ConditionType::ProductBased => "product_based",
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConditionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min_total" => Ok(ConditionType::MinTotal),
            "min_quantity" => Ok(ConditionType::MinQuantity),
            "product_based" => Ok(ConditionType::ProductBased),
            _ => Err(format!("Invalid condition type: {}", s)),
        }
    }
}

/// How a bundle discount's `value` is interpreted
///
/// Read from the `type` key of a bundle rule's parameters. Anything other than
/// `percentage` or `fixed` is kept verbatim and grants no discount.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum BundleValueKind {
    Percentage,
    Fixed,
    Unsupported(String),
}

impl Default for BundleValueKind {
    fn default() -> Self {
        BundleValueKind::Percentage
    }
}

impl From<String> for BundleValueKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "percentage" => BundleValueKind::Percentage,
            "fixed" => BundleValueKind::Fixed,
            _ => BundleValueKind::Unsupported(value),
        }
    }
}

impl fmt::Display for BundleValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleValueKind::Percentage => write!(f, "percentage"),
            BundleValueKind::Fixed => write!(f, "fixed"),
            BundleValueKind::Unsupported(other) => write!(f, "{}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_rule_type_display() {
        assert_eq!(RuleType::PercentageDiscount.to_string(), "percentage_discount");
        assert_eq!(RuleType::FixedDiscount.to_string(), "fixed_discount");
        assert_eq!(RuleType::BuyXGetY.to_string(), "buy_x_get_y");
        assert_eq!(RuleType::BundleDiscount.to_string(), "bundle_discount");
    }

    #[test]
    fn test_rule_type_from_str() {
        assert_eq!(
            RuleType::from_str("buy_x_get_y").unwrap(),
            RuleType::BuyXGetY
        );
        assert_eq!(
            RuleType::from_str("bundle_discount").unwrap(),
            RuleType::BundleDiscount
        );
        assert!(RuleType::from_str("loyalty_bonus").is_err());
    }

    #[test]
    fn test_condition_type_round_trip_through_text() {
        for kind in [
            ConditionType::MinTotal,
            ConditionType::MinQuantity,
            ConditionType::ProductBased,
        ] {
            assert_eq!(ConditionType::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(ConditionType::from_str("weekday").is_err());
    }

    #[test]
    fn test_bundle_value_kind_deserialization() {
        let kind: BundleValueKind = serde_json::from_str("\"fixed\"").unwrap();
        assert_eq!(kind, BundleValueKind::Fixed);

        let kind: BundleValueKind = serde_json::from_str("\"percentage\"").unwrap();
        assert_eq!(kind, BundleValueKind::Percentage);

        let kind: BundleValueKind = serde_json::from_str("\"per_unit\"").unwrap();
        assert_eq!(kind, BundleValueKind::Unsupported("per_unit".to_string()));
    }

    #[test]
    fn test_bundle_value_kind_default() {
        assert_eq!(BundleValueKind::default(), BundleValueKind::Percentage);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&RuleType::FixedDiscount).unwrap();
        assert_eq!(json, "\"fixed_discount\"");

        let json = serde_json::to_string(&ConditionType::ProductBased).unwrap();
        assert_eq!(json, "\"product_based\"");
    }
}
