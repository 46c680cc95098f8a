//! Tolerant field deserializers for model-written plans
//!
//! Models emit `null` for fields they have nothing to say about and quote
//! numbers ("4500", "₹1,200"). These helpers map such values onto the field
//! default instead of failing the whole plan.

use super::result::{EstimatedCosts, TripStatus};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let digits: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

/// String field; `null` becomes empty, scalars are rendered as text
pub(crate) fn string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Amount field; accepts numbers and numeric strings, anything else is 0
pub(crate) fn number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_of(&value).filter(|n| n.is_finite()).unwrap_or(0.0))
}

/// Non-negative integer field, rounded from whatever number is given
pub(crate) fn count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_of(&value)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round() as u32)
        .unwrap_or(0))
}

pub(crate) fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}

/// List field; `null` becomes empty
pub(crate) fn list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Label list; a comma-separated string is split, non-text entries dropped
pub(crate) fn strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

/// Status field; unknown or missing values read as draft
pub(crate) fn status<'de, D>(deserializer: D) -> std::result::Result<TripStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "saved" => TripStatus::Saved,
            "booked" => TripStatus::Booked,
            _ => TripStatus::Draft,
        },
        _ => TripStatus::Draft,
    })
}

pub(crate) fn costs<'de, D>(deserializer: D) -> std::result::Result<EstimatedCosts, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<EstimatedCosts>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_of_strips_symbols_and_separators() {
        assert_eq!(number_of(&json!("₹1,200")), Some(1200.0));
        assert_eq!(number_of(&json!(" 4500.5 ")), Some(4500.5));
        assert_eq!(number_of(&json!(7)), Some(7.0));
        assert_eq!(number_of(&json!("about a lot")), None);
        assert_eq!(number_of(&Value::Null), None);
    }
}
