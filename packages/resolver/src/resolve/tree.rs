//! Small helpers for reading and rewriting JSON tree nodes.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{
    ATTRIBUTE_KEY, BUSINESS_PROFILE_KEY, IDENTIFIER_FIELD, NAMESPACE_DECLARATION, NAMESPACE_KEY,
    POPULATION_PROFILE_KEY, TEXT_KEY, TYPE_ATTRIBUTE, TYPE_KEY, VALUE_KEY,
};
use crate::xml::local_type_name;

/// Nodes that carry nothing to resolve.
pub fn is_absent(node: &Value) -> bool {
    match node {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Keys holding registry profiles attached by an earlier step.
pub fn is_attachment_key(key: &str) -> bool {
    key == BUSINESS_PROFILE_KEY || key == POPULATION_PROFILE_KEY
}

/// Keys that are never descended into as data fields.
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with(ATTRIBUTE_KEY) || key == TYPE_KEY || key == NAMESPACE_KEY
}

/// Local type name declared in the node's attribute bag.
pub fn declared_type(node: &Map<String, Value>) -> Option<&str> {
    node.get(ATTRIBUTE_KEY)?
        .get(TYPE_ATTRIBUTE)?
        .as_str()
        .map(local_type_name)
        .filter(|name| !name.is_empty())
}

/// Organization or national identity number of a person node.
pub fn identifier(node: &Map<String, Value>) -> Option<String> {
    scalar_text(node.get(IDENTIFIER_FIELD)?)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get(TEXT_KEY)
            .or_else(|| map.get(VALUE_KEY))
            .and_then(scalar_text),
        _ => None,
    }
}

/// `_type` / `_namespace` metadata as an ordered map.
pub fn type_metadata(type_name: &str, namespace: Option<&str>) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert(TYPE_KEY.to_string(), Value::String(type_name.to_string()));
    if let Some(namespace) = namespace {
        metadata.insert(NAMESPACE_KEY.to_string(), Value::String(namespace.to_string()));
    }
    metadata
}

/// Put `metadata` ahead of the node's fields.
///
/// Fields already present on the node keep their value; only their position
/// moves to where the metadata declared them.
pub fn prepend_metadata(node: &mut Map<String, Value>, metadata: Map<String, Value>) {
    let existing = std::mem::take(node);
    let mut merged = metadata;
    for (key, value) in existing {
        merged.insert(key, value);
    }
    *node = merged;
}

/// Attach a registry profile under `key`.
pub fn attach_profile<T: Serialize>(
    node: &mut Map<String, Value>,
    key: &str,
    profile: &T,
) -> Result<(), serde_json::Error> {
    node.insert(key.to_string(), serde_json::to_value(profile)?);
    Ok(())
}

/// Set a boolean flag on the node.
pub fn set_flag(node: &mut Map<String, Value>, flag: &str) {
    node.insert(flag.to_string(), Value::Bool(true));
}

/// Whether the attribute bag holds nothing beyond the type tag.
///
/// Namespace declarations only serve the tag's prefix and do not count.
pub fn attribute_bag_is_redundant(node: &Map<String, Value>) -> bool {
    node.get(ATTRIBUTE_KEY)
        .and_then(Value::as_object)
        .is_some_and(|bag| {
            bag.contains_key(TYPE_ATTRIBUTE)
                && bag
                    .keys()
                    .all(|key| key == TYPE_ATTRIBUTE || is_namespace_declaration(key))
        })
}

fn is_namespace_declaration(key: &str) -> bool {
    key == NAMESPACE_DECLARATION
        || key
            .strip_prefix(NAMESPACE_DECLARATION)
            .is_some_and(|rest| rest.starts_with(':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_is_absent() {
        assert!(is_absent(&Value::Null));
        assert!(is_absent(&json!("")));
        assert!(!is_absent(&json!("0")));
        assert!(!is_absent(&json!(false)));
        assert!(!is_absent(&json!({})));
    }

    #[test]
    fn test_declared_type_strips_prefix() {
        let node = object(json!({ "$": { "xsi:type": "ns4:JuridiskPerson" } }));
        assert_eq!(declared_type(&node), Some("JuridiskPerson"));

        let untyped = object(json!({ "$": { "id": "1" } }));
        assert_eq!(declared_type(&untyped), None);
    }

    #[test]
    fn test_identifier_forms() {
        assert_eq!(
            identifier(&object(json!({ "nummer": " 912345678 " }))),
            Some("912345678".to_string())
        );
        assert_eq!(
            identifier(&object(json!({ "nummer": 912345678 }))),
            Some("912345678".to_string())
        );
        assert_eq!(
            identifier(&object(json!({ "nummer": { "$": { "a": "b" }, "_": "912345678" } }))),
            Some("912345678".to_string())
        );
        assert_eq!(identifier(&object(json!({ "nummer": "" }))), None);
        assert_eq!(identifier(&object(json!({ "navn": "x" }))), None);
    }

    #[test]
    fn test_prepend_metadata_orders_and_keeps_existing_values() {
        let mut node = object(json!({ "navn": "Ola", "_type": "Fixed" }));
        prepend_metadata(&mut node, type_metadata("FysiskPerson", Some("urn:d")));

        let keys: Vec<&str> = node.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["_type", "_namespace", "navn"]);
        assert_eq!(node["_type"], json!("Fixed"));
        assert_eq!(node["_namespace"], json!("urn:d"));
    }

    #[test]
    fn test_attribute_bag_redundancy() {
        let tag_only = object(json!({ "$": { "xsi:type": "a:B" } }));
        assert!(attribute_bag_is_redundant(&tag_only));

        let with_declaration = object(json!({ "$": { "xmlns:a": "urn:a", "xsi:type": "a:B" } }));
        assert!(attribute_bag_is_redundant(&with_declaration));

        let default_ns = object(json!({ "$": { "xmlns": "urn:d", "xmlns:a": "urn:a", "xsi:type": "a:B" } }));
        assert!(attribute_bag_is_redundant(&default_ns));

        let with_data = object(json!({ "$": { "xsi:type": "a:B", "id": "1" } }));
        assert!(!attribute_bag_is_redundant(&with_data));

        let busy = object(json!({ "$": { "xmlns:a": "urn:a", "xsi:type": "a:B", "id": "1" } }));
        assert!(!attribute_bag_is_redundant(&busy));

        let lookalike = object(json!({ "$": { "xsi:type": "a:B", "xmlnsFoo": "x" } }));
        assert!(!attribute_bag_is_redundant(&lookalike));

        let untyped = object(json!({ "$": { "id": "1" } }));
        assert!(!attribute_bag_is_redundant(&untyped));
    }

    #[test]
    fn test_reserved_keys() {
        assert!(is_reserved_key("$"));
        assert!(is_reserved_key("_type"));
        assert!(is_reserved_key("_namespace"));
        assert!(!is_reserved_key("_"));
        assert!(!is_reserved_key("value"));
        assert!(is_attachment_key("brreg"));
        assert!(is_attachment_key("freg"));
    }
}
