//! Extraction of declared `xsi:type` variants from a parsed response.

use roxmltree::{Document, Node};
use serde::Serialize;

use crate::config::XSI_NAMESPACE;
use crate::xml::utils::split_declared_type;

/// A declared variant identity found on one markup node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeTag {
    /// Local type name, e.g. `JuridiskPerson`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Namespace URI the prefix was bound to where the tag was first seen.
    pub namespace: String,
}

/// The distinct type tags of one document, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeTagSet {
    tags: Vec<TypeTag>,
}

impl TypeTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag unless one with the same type name is already present.
    ///
    /// Returns `true` if the tag was added.
    pub fn insert(&mut self, tag: TypeTag) -> bool {
        if self.get(&tag.type_name).is_some() {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeTag> {
        self.tags.iter().find(|tag| tag.type_name == type_name)
    }

    /// Namespace of a known variant.
    pub fn namespace_of(&self, type_name: &str) -> Option<&str> {
        self.get(type_name).map(|tag| tag.namespace.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeTag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<TypeTag> for TypeTagSet {
    fn from_iter<I: IntoIterator<Item = TypeTag>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

/// Read the type tag declared on a single element, if any.
pub fn type_tag_of(node: Node<'_, '_>) -> Option<TypeTag> {
    let declared = node.attribute((XSI_NAMESPACE, "type"))?;
    let (prefix, type_name) = split_declared_type(declared);
    if type_name.is_empty() {
        return None;
    }

    let namespace = node
        .lookup_namespace_uri(prefix)
        .unwrap_or_default()
        .to_string();

    Some(TypeTag {
        type_name: type_name.to_string(),
        namespace,
    })
}

/// Collect every distinct type tag declared anywhere in the document.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use matrikkel_resolver::xml::extract_type_tags;
///
/// let xml = r#"<eiere xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:d="urn:domain">
///     <eier xsi:type="d:JuridiskPerson"/>
///     <eier xsi:type="d:JuridiskPerson"/>
/// </eiere>"#;
/// let doc = Document::parse(xml).unwrap();
/// let tags = extract_type_tags(&doc);
/// assert_eq!(tags.len(), 1);
/// assert_eq!(tags.namespace_of("JuridiskPerson"), Some("urn:domain"));
/// ```
pub fn extract_type_tags(doc: &Document<'_>) -> TypeTagSet {
    doc.descendants()
        .filter(|node| node.is_element())
        .filter_map(type_tag_of)
        .collect()
}
