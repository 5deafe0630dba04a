// Lenient readers for rule parameter fields
//
// Rule parameters are edited by hand, so counts arrive as `5`, `5.0` or `"5"`.
// Every reader here accepts what it can and never errors, so one bad key only
// affects its own field and never the whole parameter object.

use crate::pricing::types::BundleValueKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Whole number from an integer, an integral float or a numeric string
fn whole_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if number.is_finite() && number.fract() == 0.0 {
        Some(number)
    } else {
        None
    }
}

fn count(value: &Value) -> Option<u32> {
    if let Some(exact) = value.as_u64() {
        return u32::try_from(exact).ok();
    }
    let number = whole_number(value)?;
    if (0.0..=f64::from(u32::MAX)).contains(&number) {
        Some(number as u32)
    } else {
        None
    }
}

fn id(value: &Value) -> Option<i64> {
    if let Some(exact) = value.as_i64() {
        return Some(exact);
    }
    if let Value::String(text) = value {
        if let Ok(exact) = text.trim().parse::<i64>() {
            return Some(exact);
        }
    }
    let number = whole_number(value)?;
    // 2^63 itself is out of range for i64
    if number >= i64::MIN as f64 && number < i64::MAX as f64 {
        Some(number as i64)
    } else {
        None
    }
}

fn decimal(value: &Value) -> Option<Decimal> {
    serde_json::from_value(value.clone()).ok()
}

fn unreadable<T>(value: &Value) -> Option<T> {
    tracing::warn!("Ignoring unreadable pricing rule parameter {}", value);
    None
}

/// Count threshold; `None` when present but unreadable
pub fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count(&value).or_else(|| unreadable(&value)))
}

/// Count that grants nothing when unreadable
pub fn count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_count(deserializer)?.unwrap_or(0))
}

/// Product id; `null` means no target
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(id(&value).or_else(|| unreadable(&value)))
}

/// Product id list; any unreadable member empties it
pub fn id_list_or_empty<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let ids = match &value {
        Value::Array(members) => members.iter().map(id).collect::<Option<Vec<i64>>>(),
        _ => None,
    };
    Ok(ids.or_else(|| unreadable(&value)).unwrap_or_default())
}

/// Money or percentage threshold; `None` when present but unreadable
pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal(&value).or_else(|| unreadable(&value)))
}

/// Discount amount that grants nothing when unreadable
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_decimal(deserializer)?.unwrap_or(Decimal::ZERO))
}

/// Bundle value kind; anything but a string is kept as unsupported text
pub fn bundle_kind<'de, D>(deserializer: D) -> Result<BundleValueKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => BundleValueKind::from(text),
        other => BundleValueKind::Unsupported(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_count_accepts_integral_forms() {
        assert_eq!(count(&json!(5)), Some(5));
        assert_eq!(count(&json!(5.0)), Some(5));
        assert_eq!(count(&json!("5")), Some(5));
        assert_eq!(count(&json!(" 7 ")), Some(7));
    }

    #[test]
    fn test_count_rejects_fractions_negatives_and_text() {
        assert_eq!(count(&json!(2.5)), None);
        assert_eq!(count(&json!(-4)), None);
        assert_eq!(count(&json!("lots")), None);
        assert_eq!(count(&json!(true)), None);
        assert_eq!(count(&json!(5_000_000_000u64)), None);
    }

    #[test]
    fn test_id_accepts_integral_forms() {
        assert_eq!(id(&json!(12)), Some(12));
        assert_eq!(id(&json!(1.0)), Some(1));
        assert_eq!(id(&json!("3")), Some(3));
        assert_eq!(id(&json!(1.5)), None);
        assert_eq!(id(&json!({"id": 1})), None);
    }

    #[test]
    fn test_decimal_accepts_numbers_and_strings() {
        assert_eq!(decimal(&json!(20)), Some(dec!(20)));
        assert_eq!(decimal(&json!("19.99")), Some(dec!(19.99)));
        assert_eq!(decimal(&json!("lots")), None);
        assert_eq!(decimal(&json!([1])), None);
    }
}
