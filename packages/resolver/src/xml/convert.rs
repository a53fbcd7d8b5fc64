//! Conversion of a parsed response into the JSON tree the resolvers rewrite.
//!
//! The layout mirrors what consumers of the Matrikkel API have always
//! received:
//! - element names lose their namespace prefix
//! - attributes (including namespace declarations) go into a `$` bag
//! - an element with only text becomes a string, an empty one `""`
//! - text next to attributes or child elements is kept under `_`
//! - repeated child elements become an array, a single one stays a value

use roxmltree::{Document, Node};
use serde_json::{Map, Value};

use crate::config::{ATTRIBUTE_KEY, TEXT_KEY};
use crate::xml::utils::{declared_namespaces, element_children, get_tag_name, qualified_attribute_name};

/// Convert a whole document, keyed by its root element name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use matrikkel_resolver::xml::to_json;
///
/// let doc = Document::parse("<svar><id>1</id><id>2</id></svar>").unwrap();
/// assert_eq!(to_json(&doc), serde_json::json!({ "svar": { "id": ["1", "2"] } }));
/// ```
pub fn to_json(doc: &Document<'_>) -> Value {
    let root = doc.root_element();
    let mut map = Map::new();
    map.insert(get_tag_name(root).to_string(), element_to_json(root));
    Value::Object(map)
}

/// Convert a single element.
pub fn element_to_json(node: Node<'_, '_>) -> Value {
    let attributes = attribute_bag(node);
    let text = own_text(node);
    let has_children = element_children(node).next().is_some();

    if attributes.is_empty() && !has_children {
        return Value::String(text);
    }

    let mut map = Map::new();
    if !attributes.is_empty() {
        map.insert(ATTRIBUTE_KEY.to_string(), Value::Object(attributes));
    }
    if !text.is_empty() {
        map.insert(TEXT_KEY.to_string(), Value::String(text));
    }

    for child in element_children(node) {
        let name = get_tag_name(child).to_string();
        let value = element_to_json(child);
        match map.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(name, value);
            }
        }
    }

    Value::Object(map)
}

fn attribute_bag(node: Node<'_, '_>) -> Map<String, Value> {
    let mut bag = Map::new();
    for (name, uri) in declared_namespaces(node) {
        bag.insert(name, Value::String(uri));
    }
    for attribute in node.attributes() {
        bag.insert(
            qualified_attribute_name(node, &attribute),
            Value::String(attribute.value().to_string()),
        );
    }
    bag
}

/// Concatenated direct text children, trimmed.
fn own_text(node: Node<'_, '_>) -> String {
    let text: String = node
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect();
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_text_only_element_is_string() {
        let doc = Document::parse("<nummer> 912345678 </nummer>").unwrap();
        assert_eq!(to_json(&doc), json!({ "nummer": "912345678" }));
    }

    #[test]
    fn test_empty_element_is_empty_string() {
        let doc = Document::parse("<root><tom/></root>").unwrap();
        assert_eq!(to_json(&doc), json!({ "root": { "tom": "" } }));
    }

    #[test]
    fn test_prefixes_are_stripped_from_element_names() {
        let xml = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><svar>1</svar></soap:Body></soap:Envelope>"#;
        let doc = Document::parse(xml).unwrap();
        let value = to_json(&doc);
        assert_eq!(value["Envelope"]["Body"]["svar"], json!("1"));
        assert_eq!(
            value["Envelope"]["$"]["xmlns:soap"],
            json!("http://schemas.xmlsoap.org/soap/envelope/")
        );
    }

    #[test]
    fn test_attributes_and_text() {
        let xml = r#"<root xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><eier xsi:type="d:JuridiskPerson" xmlns:d="urn:d"><nummer>912345678</nummer></eier><kode id="7">K</kode></root>"#;
        let doc = Document::parse(xml).unwrap();
        let value = to_json(&doc);

        assert_eq!(
            value["root"]["eier"],
            json!({
                "$": { "xmlns:d": "urn:d", "xsi:type": "d:JuridiskPerson" },
                "nummer": "912345678"
            })
        );
        assert_eq!(value["root"]["kode"], json!({ "$": { "id": "7" }, "_": "K" }));
    }

    #[test]
    fn test_repeated_children_become_array_in_order() {
        let xml = "<root><item>a</item><other>x</other><item>b</item><item>c</item></root>";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(
            to_json(&doc),
            json!({ "root": { "item": ["a", "b", "c"], "other": "x" } })
        );
    }
}
