//! Translation between DynamoDB attribute values and JSON items.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Number, Value};

use super::{StoreError, StoreResult};
use crate::models::Item;

pub fn item_from_attributes(attributes: &HashMap<String, AttributeValue>) -> StoreResult<Item> {
    attributes
        .iter()
        .map(|(name, value)| Ok((name.clone(), value_from_attribute(value)?)))
        .collect()
}

pub fn attributes_from_item(item: &Item) -> HashMap<String, AttributeValue> {
    item.iter().map(|(name, value)| (name.clone(), attribute_from_value(value))).collect()
}

pub fn number_attribute(n: i64) -> AttributeValue {
    AttributeValue::N(n.to_string())
}

fn value_from_attribute(value: &AttributeValue) -> StoreResult<Value> {
    let value = match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_from_str(n)?,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::B(blob) => bytes_to_value(blob.as_ref()),
        AttributeValue::L(values) => {
            Value::Array(values.iter().map(value_from_attribute).collect::<StoreResult<_>>()?)
        },
        AttributeValue::M(map) => Value::Object(item_from_attributes(map)?),
        AttributeValue::Ss(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        },
        AttributeValue::Ns(values) => {
            Value::Array(values.iter().map(|n| number_from_str(n)).collect::<StoreResult<_>>()?)
        },
        AttributeValue::Bs(blobs) => {
            Value::Array(blobs.iter().map(|b| bytes_to_value(b.as_ref())).collect())
        },
        other => {
            return Err(StoreError::Malformed(format!("unsupported attribute value {other:?}")));
        },
    };

    Ok(value)
}

fn attribute_from_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) if s.is_empty() => AttributeValue::Null(true),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(attribute_from_value).collect()),
        Value::Object(map) => AttributeValue::M(attributes_from_item(map)),
    }
}

fn number_from_str(raw: &str) -> StoreResult<Value> {
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Value::from(n));
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Ok(Value::from(n));
    }

    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| StoreError::Malformed(format!("invalid number attribute `{raw}`")))
}

fn bytes_to_value(bytes: &[u8]) -> Value {
    Value::Array(bytes.iter().map(|b| Value::from(*b)).collect())
}
