//! XML utility functions for navigating parsed Matrikkel responses.

use roxmltree::{Attribute, Node};

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use matrikkel_resolver::xml::get_tag_name;
///
/// let xml = r#"<ns:root xmlns:ns="http://example.com"><ns:eier/></ns:root>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "root");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Get all element children of a node.
///
/// # Returns
/// Iterator over element children (excludes text nodes, comments, etc.)
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Strip the namespace prefix from a declared type.
///
/// `"ns4:JuridiskPerson"` becomes `"JuridiskPerson"`; an unprefixed value is
/// returned as is.
///
/// # Examples
/// ```
/// use matrikkel_resolver::xml::local_type_name;
///
/// assert_eq!(local_type_name("ns4:JuridiskPerson"), "JuridiskPerson");
/// assert_eq!(local_type_name("FysiskPerson"), "FysiskPerson");
/// ```
pub fn local_type_name(declared: &str) -> &str {
    match declared.split_once(':') {
        Some((_, rest)) => rest.split(':').next().unwrap_or(rest),
        None => declared,
    }
}

/// Split a declared type into its prefix (if any) and local name.
pub fn split_declared_type(declared: &str) -> (Option<&str>, &str) {
    match declared.split_once(':') {
        Some((prefix, _)) => (Some(prefix), local_type_name(declared)),
        None => (None, declared),
    }
}

/// Attribute name as written in the markup, `prefix:local` when namespaced.
///
/// Falls back to the local name when the namespace has no prefix in scope.
pub fn qualified_attribute_name(node: Node<'_, '_>, attribute: &Attribute<'_, '_>) -> String {
    match attribute
        .namespace()
        .and_then(|uri| node.lookup_prefix(uri))
    {
        Some(prefix) => format!("{prefix}:{}", attribute.name()),
        None => attribute.name().to_string(),
    }
}

/// Namespace declarations made on this node rather than inherited from an ancestor.
///
/// Returned as `(attribute name, uri)` pairs, e.g. `("xmlns:ns4", "http://...")`.
pub fn declared_namespaces(node: Node<'_, '_>) -> Vec<(String, String)> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .filter(|ns| ns.name() != Some("xml"))
        .map(|ns| {
            let name = match ns.name() {
                Some(prefix) => format!("xmlns:{prefix}"),
                None => "xmlns".to_string(),
            };
            (name, ns.uri().to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<ns:root xmlns:ns="http://example.com"><ns:child/></ns:root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "root");
    }

    #[test]
    fn test_element_children() {
        let xml = r#"<root>text<child1/>more<child2/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let children: Vec<_> = element_children(doc.root_element()).collect();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_local_type_name() {
        assert_eq!(local_type_name("ns4:JuridiskPerson"), "JuridiskPerson");
        assert_eq!(local_type_name("JuridiskPerson"), "JuridiskPerson");
        assert_eq!(local_type_name("a:b:c"), "b");
        assert_eq!(local_type_name(""), "");
    }

    #[test]
    fn test_split_declared_type() {
        assert_eq!(
            split_declared_type("ns4:FysiskPerson"),
            (Some("ns4"), "FysiskPerson")
        );
        assert_eq!(split_declared_type("FysiskPerson"), (None, "FysiskPerson"));
    }

    #[test]
    fn test_qualified_attribute_name() {
        let xml = r#"<eier xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="ns:X" id="1"/>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();
        let names: Vec<String> = root
            .attributes()
            .map(|a| qualified_attribute_name(root, &a))
            .collect();
        assert_eq!(names, vec!["xsi:type".to_string(), "id".to_string()]);
    }

    #[test]
    fn test_declared_namespaces_only_on_declaring_node() {
        let xml = r#"<a xmlns:x="urn:x"><b xmlns:y="urn:y"/></a>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();
        assert_eq!(
            declared_namespaces(root),
            vec![("xmlns:x".to_string(), "urn:x".to_string())]
        );

        let b = root.first_element_child().unwrap();
        assert_eq!(
            declared_namespaces(b),
            vec![("xmlns:y".to_string(), "urn:y".to_string())]
        );
    }
}
