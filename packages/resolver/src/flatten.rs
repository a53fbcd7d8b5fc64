//! Flattening of response bodies into one row per data item.
//!
//! Responses wrap their data in boilerplate: `item`, `items`, or
//! `<operationResponse>.return.item`. [`extract_items`] strips that away, and
//! [`flatten_object`] turns each remaining item into a single level map with
//! dot-separated keys.

use serde_json::{Map, Value};

use crate::config::VALUE_KEY;

const ITEM_KEY: &str = "item";
const ITEMS_KEY: &str = "items";
const RETURN_KEY: &str = "return";

/// Collect the data items of every response in `responses`.
pub fn extract_items(responses: &[Value]) -> Vec<Value> {
    let mut items = Vec::new();

    for response in responses {
        let Value::Object(fields) = response else {
            items.push(response.clone());
            continue;
        };

        if let Some(item) = fields.get(ITEM_KEY) {
            push_all(&mut items, item);
        } else if let Some(found) = fields.get(ITEMS_KEY) {
            push_all(&mut items, found);
        } else if let Some(returned) = fields
            .values()
            .next()
            .and_then(|first| first.get(RETURN_KEY))
        {
            match returned.get(ITEM_KEY) {
                Some(Value::Array(list)) => items.extend(list.iter().map(unwrap_value)),
                Some(item) => items.push(item.clone()),
                None => {}
            }
        } else {
            items.push(response.clone());
        }
    }

    items
}

fn push_all(items: &mut Vec<Value>, found: &Value) {
    match found {
        Value::Array(list) => items.extend(list.iter().cloned()),
        other => items.push(other.clone()),
    }
}

/// `{ "value": x }` items carry nothing but `x`.
fn unwrap_value(item: &Value) -> Value {
    match item {
        Value::Object(map) if map.len() == 1 => match map.get(VALUE_KEY) {
            Some(value) if !value.is_null() => value.clone(),
            _ => item.clone(),
        },
        _ => item.clone(),
    }
}

/// Flatten nested objects and arrays into dot-separated keys.
///
/// Array elements are keyed by their index. Empty objects and arrays are kept
/// as leaves so no field disappears.
pub fn flatten_object(value: &Value) -> Map<String, Value> {
    let mut flat = Map::new();
    match value {
        Value::Object(_) | Value::Array(_) => flatten_into(&mut flat, None, value),
        scalar => {
            flat.insert(VALUE_KEY.to_string(), scalar.clone());
        }
    }
    flat
}

fn flatten_into(flat: &mut Map<String, Value>, prefix: Option<&str>, value: &Value) {
    let join = |key: &str| match prefix {
        Some(prefix) => format!("{prefix}.{key}"),
        None => key.to_string(),
    };

    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(flat, Some(&join(key)), child);
            }
        }
        Value::Array(list) if !list.is_empty() => {
            for (index, child) in list.iter().enumerate() {
                flatten_into(flat, Some(&join(&index.to_string())), child);
            }
        }
        leaf => {
            if let Some(prefix) = prefix {
                flat.insert(prefix.to_string(), leaf.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_extract_items_from_item_lists() {
        let responses = vec![
            json!({ "item": [{ "id": 1 }, { "id": 2 }] }),
            json!({ "item": { "id": 3 } }),
            json!({ "items": [{ "id": 4 }] }),
        ];
        let ids: Vec<Value> = extract_items(&responses)
            .iter()
            .map(|item| item["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3), json!(4)]);
    }

    #[test]
    fn test_extract_items_from_operation_return() {
        let responses = vec![json!({
            "findMatrikkelenheterResponse": {
                "return": { "item": [{ "value": "1001" }, { "value": "1002", "extra": true }] }
            }
        })];
        assert_eq!(
            extract_items(&responses),
            vec![json!("1001"), json!({ "value": "1002", "extra": true })]
        );
    }

    #[test]
    fn test_extract_items_keeps_unknown_shapes() {
        let responses = vec![json!({ "svar": { "id": "1" } })];
        assert_eq!(extract_items(&responses), responses);
    }

    #[test]
    fn test_flatten_object() {
        let item = json!({
            "_type": "Teig",
            "areal": { "_type": "double", "value": "12" },
            "eiere": [{ "navn": "Ola" }, { "navn": "Kari" }],
            "tom": {}
        });
        let flat = flatten_object(&item);
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            vec!["_type", "areal._type", "areal.value", "eiere.0.navn", "eiere.1.navn", "tom"]
        );
        assert_eq!(flat["eiere.1.navn"], json!("Kari"));
        assert_eq!(flat["tom"], json!({}));
    }

    #[test]
    fn test_flatten_scalar() {
        assert_eq!(flatten_object(&json!("1001"))["value"], json!("1001"));
    }
}
