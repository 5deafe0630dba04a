// Typed pricing rules
//
// A stored rule carries its condition and discount parameters as loose JSON.
// `PricingRule::from_record` reads them once into the closed `Condition` and
// `Discount` sum types so evaluation never re-parses anything.

use crate::models::PricingRuleRecord;
use crate::pricing::serde_helpers;
use crate::pricing::types::{BundleValueKind, ConditionType, RuleType};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;

// Condition thresholds are `None` when the stored value cannot be read, and a
// condition without a threshold is never satisfied.

/// `min_total` condition parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MinTotalParams {
    #[serde(deserialize_with = "serde_helpers::optional_decimal")]
    pub min_amount: Option<Decimal>,
}

impl Default for MinTotalParams {
    fn default() -> Self {
        Self {
            min_amount: Some(Decimal::ZERO),
        }
    }
}

/// `min_quantity` condition parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MinQuantityParams {
    #[serde(deserialize_with = "serde_helpers::optional_count")]
    pub min_quantity: Option<u32>,
}

impl Default for MinQuantityParams {
    fn default() -> Self {
        Self {
            min_quantity: Some(0),
        }
    }
}

/// `product_based` condition parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductBasedParams {
    #[serde(deserialize_with = "serde_helpers::optional_id")]
    pub product_id: Option<i64>,
    #[serde(deserialize_with = "serde_helpers::optional_count")]
    pub min_quantity: Option<u32>,
}

impl Default for ProductBasedParams {
    fn default() -> Self {
        Self {
            product_id: None,
            min_quantity: Some(1),
        }
    }
}

// Discount fields that cannot be read grant nothing.

/// `percentage_discount` parameters (10 = 10% off)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PercentageParams {
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub percentage: Decimal,
}

/// `fixed_discount` parameters
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FixedParams {
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub amount: Decimal,
}

/// `buy_x_get_y` parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuyXGetYParams {
    #[serde(deserialize_with = "serde_helpers::optional_id")]
    pub product_id: Option<i64>,
    #[serde(deserialize_with = "serde_helpers::count_or_zero")]
    pub buy_quantity: u32,
    #[serde(deserialize_with = "serde_helpers::count_or_zero")]
    pub get_free_quantity: u32,
}

impl Default for BuyXGetYParams {
    fn default() -> Self {
        Self {
            product_id: None,
            buy_quantity: 1,
            get_free_quantity: 1,
        }
    }
}

/// `bundle_discount` parameters
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BundleParams {
    #[serde(deserialize_with = "serde_helpers::id_list_or_empty")]
    pub products: Vec<i64>,
    #[serde(rename = "type", deserialize_with = "serde_helpers::bundle_kind")]
    pub kind: BundleValueKind,
    #[serde(deserialize_with = "serde_helpers::decimal_or_zero")]
    pub value: Decimal,
}

/// Trigger condition of a rule
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    MinTotal(MinTotalParams),
    MinQuantity(MinQuantityParams),
    ProductBased(ProductBasedParams),
    /// Unknown condition type, or parameters that are not an object; never satisfied
    Unsupported(String),
}

/// Discount a rule grants once its condition holds
#[derive(Debug, Clone, PartialEq)]
pub enum Discount {
    Percentage(PercentageParams),
    Fixed(FixedParams),
    BuyXGetY(BuyXGetYParams),
    Bundle(BundleParams),
    /// Unknown rule type, or parameters that are not an object; always zero
    Unsupported(String),
}

impl Discount {
    /// Rule type label as stored, used in applied-rule records
    pub fn type_name(&self) -> &str {
        match self {
            Discount::Percentage(_) => RuleType::PercentageDiscount.as_str(),
            Discount::Fixed(_) => RuleType::FixedDiscount.as_str(),
            Discount::BuyXGetY(_) => RuleType::BuyXGetY.as_str(),
            Discount::Bundle(_) => RuleType::BundleDiscount.as_str(),
            Discount::Unsupported(name) => name,
        }
    }
}

/// A pricing rule ready for evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRule {
    pub id: i64,
    pub name: String,
    pub priority: i32,
    pub is_active: bool,
    pub condition: Condition,
    pub discount: Discount,
}

impl PricingRule {
    /// Build a typed rule from its stored record
    ///
    /// Never fails. Unknown kinds and non-object parameters become `Unsupported`
    /// arms. Missing keys take defaults, and each unreadable key fails closed on
    /// its own without disturbing its siblings.
    pub fn from_record(record: &PricingRuleRecord) -> Self {
        let condition = match record.condition_type.parse::<ConditionType>() {
            Ok(kind) => {
                let value = &record.condition_value;
                let parsed = match kind {
                    ConditionType::MinTotal => {
                        read_params(record, "condition", value).map(Condition::MinTotal)
                    }
                    ConditionType::MinQuantity => {
                        read_params(record, "condition", value).map(Condition::MinQuantity)
                    }
                    ConditionType::ProductBased => {
                        read_params(record, "condition", value).map(Condition::ProductBased)
                    }
                };
                parsed.unwrap_or_else(|| Condition::Unsupported(record.condition_type.clone()))
            }
            Err(_) => {
                tracing::warn!(
                    "Pricing rule {} has unknown condition type '{}'; it will never apply",
                    record.id,
                    record.condition_type
                );
                Condition::Unsupported(record.condition_type.clone())
            }
        };

        // buy_x_get_y and bundle rules keep their product keys on the condition side
        let discount_params = merged_discount_params(record);
        let discount = match record.rule_type.parse::<RuleType>() {
            Ok(kind) => {
                let value = &discount_params;
                let parsed = match kind {
                    RuleType::PercentageDiscount => {
                        read_params(record, "discount", value).map(Discount::Percentage)
                    }
                    RuleType::FixedDiscount => {
                        read_params(record, "discount", value).map(Discount::Fixed)
                    }
                    RuleType::BuyXGetY => {
                        read_params(record, "discount", value).map(Discount::BuyXGetY)
                    }
                    RuleType::BundleDiscount => {
                        read_params(record, "discount", value).map(Discount::Bundle)
                    }
                };
                parsed.unwrap_or_else(|| Discount::Unsupported(record.rule_type.clone()))
            }
            Err(_) => {
                tracing::warn!(
                    "Pricing rule {} has unknown rule type '{}'; it will grant no discount",
                    record.id,
                    record.rule_type
                );
                Discount::Unsupported(record.rule_type.clone())
            }
        };

        Self {
            id: record.id,
            name: record.name.clone(),
            priority: record.priority,
            is_active: record.is_active,
            condition,
            discount,
        }
    }
}

/// Discount keys win; condition keys fill the gaps
fn merged_discount_params(record: &PricingRuleRecord) -> serde_json::Value {
    let mut merged = match &record.condition_value {
        serde_json::Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    if let serde_json::Value::Object(map) = &record.discount_value {
        for (key, value) in map {
            merged.insert(key.clone(), value.clone());
        }
    }
    serde_json::Value::Object(merged)
}

/// `null` reads as all defaults; anything else must be an object
fn read_params<T>(record: &PricingRuleRecord, side: &str, value: &serde_json::Value) -> Option<T>
where
    T: DeserializeOwned + Default,
{
    if value.is_null() {
        return Some(T::default());
    }
    if !value.is_object() {
        tracing::warn!(
            "Pricing rule {} has {} parameters that are not an object; it will not apply",
            record.id,
            side
        );
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(params) => Some(params),
        Err(e) => {
            tracing::warn!(
                "Pricing rule {} has unreadable {} parameters ({}); it will not apply",
                record.id,
                side,
                e
            );
            None
        }
    }
}
