use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A product in the catalog
///
/// Prices are stored as NUMERIC(12, 2) and carried as `Decimal` end to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Notebook A5")]
    pub name: String,
    #[schema(value_type = String, example = "10.00")]
    pub price: Decimal,
    #[schema(example = "Ruled, 120 pages")]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A pricing rule row as stored
///
/// `condition_value` and `discount_value` are free-form JSON objects whose keys
/// depend on `condition_type` and `rule_type`. They are parsed into typed
/// parameters once, when the rule cache loads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PricingRuleRecord {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "10% off orders over $20")]
    pub name: String,
    #[schema(example = "percentage_discount")]
    pub rule_type: String,
    #[schema(example = "min_total")]
    pub condition_type: String,
    #[schema(value_type = Object, example = json!({"min_amount": 20}))]
    pub condition_value: serde_json::Value,
    #[schema(value_type = Object, example = json!({"percentage": 10}))]
    pub discount_value: serde_json::Value,
    pub is_active: bool,
    #[schema(example = 10)]
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_product_serialization() {
        let product = Product {
            id: 1,
            name: "Notebook A5".to_string(),
            price: dec!(10.00),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).expect("Failed to serialize Product");

        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Notebook A5");
        assert_eq!(json["price"], "10.00");
        assert!(json.get("created_at").is_some());
    }

    #[test]
    fn test_pricing_rule_record_deserialization() {
        let value = json!({
            "id": 4,
            "name": "Buy 2 get 1",
            "rule_type": "buy_x_get_y",
            "condition_type": "product_based",
            "condition_value": {"product_id": 1, "buy_quantity": 2},
            "discount_value": {},
            "is_active": true,
            "priority": 5,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        });

        let record: PricingRuleRecord =
            serde_json::from_value(value).expect("Failed to deserialize PricingRuleRecord");

        assert_eq!(record.id, 4);
        assert_eq!(record.rule_type, "buy_x_get_y");
        assert_eq!(record.condition_value["buy_quantity"], 2);
        assert!(record.is_active);
    }
}
