//! Schema catalog contract and the per-pass type index.
//!
//! A catalog answers "which fields does `namespace:type` have, and of what
//! type". The resolvers only depend on the [`SchemaCatalog`] trait; the
//! [`InMemoryCatalog`] implementation holds flat type definitions and expands
//! them into nested [`ResolvedSchema`] trees on lookup.
//!
//! # Catalog file format
//!
//! ```json
//! {
//!   "urn:domain": {
//!     "Matrikkelenhet": {
//!       "eierforhold": { "type": "Eierforhold", "namespace": "urn:domain" }
//!     }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::MAX_SCHEMA_DEPTH;
use crate::error::CatalogError;
use crate::xml::TypeTagSet;

/// Resolved type identity of a node and the expected types of its fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSchema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: FieldMap,
}

/// Field name to expected field schema.
pub type FieldMap = BTreeMap<String, ResolvedSchema>;

impl ResolvedSchema {
    pub fn new(type_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            namespace: Some(namespace.into()),
            fields: FieldMap::new(),
        }
    }

    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, schema: ResolvedSchema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    /// Expected schema of a field, if the type declares it.
    pub fn field(&self, name: &str) -> Option<&ResolvedSchema> {
        self.fields.get(name)
    }
}

/// Lookup of type definitions by namespace and type name.
///
/// Must be fully loaded before a resolution pass begins.
pub trait SchemaCatalog: Send + Sync {
    fn lookup(&self, namespace: &str, type_name: &str) -> Result<Option<FieldMap>, CatalogError>;
}

/// Declared type of one field in a flat catalog definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    #[serde(rename = "type")]
    pub type_name: String,
    pub namespace: String,
}

impl FieldType {
    pub fn new(type_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            namespace: namespace.into(),
        }
    }
}

type TypeDefinitions = HashMap<String, HashMap<String, BTreeMap<String, FieldType>>>;

/// Catalog backed by flat type definitions held in memory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct InMemoryCatalog {
    types: TypeDefinitions,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type and the declared types of its fields.
    pub fn with_type<I, K>(mut self, namespace: &str, type_name: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldType)>,
        K: Into<String>,
    {
        let definition = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.types
            .entry(namespace.to_string())
            .or_default()
            .insert(type_name.to_string(), definition);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            namespaces = catalog.types.len(),
            "Schema catalog loaded"
        );
        Ok(catalog)
    }

    fn definition(&self, namespace: &str, type_name: &str) -> Option<&BTreeMap<String, FieldType>> {
        self.types.get(namespace)?.get(type_name)
    }

    /// Expand a definition into nested field schemas.
    ///
    /// `path` holds the types currently being expanded; a type is not expanded
    /// again below itself.
    fn expand(
        &self,
        definition: &BTreeMap<String, FieldType>,
        path: &mut Vec<(String, String)>,
    ) -> FieldMap {
        let mut fields = FieldMap::new();
        for (name, field_type) in definition {
            let mut schema = ResolvedSchema::new(&field_type.type_name, &field_type.namespace);
            let key = (field_type.namespace.clone(), field_type.type_name.clone());

            if path.len() < MAX_SCHEMA_DEPTH && !path.contains(&key) {
                if let Some(nested) = self.definition(&key.0, &key.1) {
                    path.push(key);
                    schema.fields = self.expand(nested, path);
                    path.pop();
                }
            }

            fields.insert(name.clone(), schema);
        }
        fields
    }
}

impl SchemaCatalog for InMemoryCatalog {
    fn lookup(&self, namespace: &str, type_name: &str) -> Result<Option<FieldMap>, CatalogError> {
        let Some(definition) = self.definition(namespace, type_name) else {
            return Ok(None);
        };
        let mut path = vec![(namespace.to_string(), type_name.to_string())];
        Ok(Some(self.expand(definition, &mut path)))
    }
}

/// Type tags of one pass together with their resolved schemas.
///
/// Built once at the start of a pass and discarded with it.
#[derive(Debug, Default)]
pub struct TypeIndex {
    tags: TypeTagSet,
    schemas: HashMap<String, ResolvedSchema>,
}

impl TypeIndex {
    /// Index tags without consulting a catalog.
    pub fn unresolved(tags: TypeTagSet) -> Self {
        Self {
            tags,
            schemas: HashMap::new(),
        }
    }

    /// Resolve every tag against the catalog.
    ///
    /// A failing lookup leaves that tag unresolved; it never fails the index.
    pub fn resolve(tags: TypeTagSet, catalog: &dyn SchemaCatalog) -> Self {
        let mut schemas = HashMap::new();
        for tag in tags.iter() {
            match catalog.lookup(&tag.namespace, &tag.type_name) {
                Ok(Some(fields)) => {
                    let schema = ResolvedSchema::new(&tag.type_name, &tag.namespace)
                        .with_fields(fields);
                    schemas.insert(tag.type_name.clone(), schema);
                }
                Ok(None) => {
                    tracing::debug!(
                        type_name = %tag.type_name,
                        namespace = %tag.namespace,
                        "No schema for type"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        type_name = %tag.type_name,
                        namespace = %tag.namespace,
                        error = %e,
                        "Schema lookup failed, type left unresolved"
                    );
                }
            }
        }
        Self { tags, schemas }
    }

    pub fn tags(&self) -> &TypeTagSet {
        &self.tags
    }

    pub fn schema_for(&self, type_name: &str) -> Option<&ResolvedSchema> {
        self.schemas.get(type_name)
    }

    pub fn namespace_of(&self, type_name: &str) -> Option<&str> {
        self.tags.namespace_of(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::TypeTag;
    use pretty_assertions::assert_eq;

    const NS: &str = "urn:domain";

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_type(
                NS,
                "Matrikkelenhet",
                [
                    ("eierforhold", FieldType::new("Eierforhold", NS)),
                    ("bruksnavn", FieldType::new("string", "urn:xsd")),
                ],
            )
            .with_type(NS, "Eierforhold", [("eier", FieldType::new("Person", NS))])
            .with_type(NS, "Person", [("nummer", FieldType::new("string", "urn:xsd"))])
    }

    #[test]
    fn test_lookup_expands_nested_types() {
        let fields = catalog().lookup(NS, "Matrikkelenhet").unwrap().unwrap();

        let eier = fields["eierforhold"].field("eier").unwrap();
        assert_eq!(eier.type_name.as_deref(), Some("Person"));
        assert_eq!(
            eier.field("nummer").unwrap().type_name.as_deref(),
            Some("string")
        );
        assert!(fields["bruksnavn"].fields.is_empty());
    }

    #[test]
    fn test_lookup_unknown_type() {
        assert_eq!(catalog().lookup(NS, "Ukjent").unwrap(), None);
        assert_eq!(catalog().lookup("urn:other", "Person").unwrap(), None);
    }

    #[test]
    fn test_recursive_type_terminates() {
        let catalog = InMemoryCatalog::new().with_type(
            NS,
            "Node",
            [("next", FieldType::new("Node", NS))],
        );
        let fields = catalog.lookup(NS, "Node").unwrap().unwrap();
        let next = &fields["next"];
        assert_eq!(next.type_name.as_deref(), Some("Node"));
        assert!(next.fields.is_empty());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "urn:domain": {
                "Teig": { "areal": { "type": "double", "namespace": "urn:xsd" } }
            }
        }"#;
        let catalog = InMemoryCatalog::from_json_str(json).unwrap();
        let fields = catalog.lookup(NS, "Teig").unwrap().unwrap();
        assert_eq!(fields["areal"], ResolvedSchema::new("double", "urn:xsd"));
    }

    struct FailingCatalog;

    impl SchemaCatalog for FailingCatalog {
        fn lookup(&self, namespace: &str, type_name: &str) -> Result<Option<FieldMap>, CatalogError> {
            Err(CatalogError::Lookup {
                namespace: namespace.to_string(),
                type_name: type_name.to_string(),
                message: "broken".to_string(),
            })
        }
    }

    #[test]
    fn test_type_index_survives_failing_catalog() {
        let tags: TypeTagSet = [TypeTag {
            type_name: "Teig".into(),
            namespace: NS.into(),
        }]
        .into_iter()
        .collect();

        let index = TypeIndex::resolve(tags, &FailingCatalog);
        assert!(index.schema_for("Teig").is_none());
        assert_eq!(index.namespace_of("Teig"), Some(NS));
    }

    #[test]
    fn test_type_index_resolves_tags() {
        let tags: TypeTagSet = [TypeTag {
            type_name: "Eierforhold".into(),
            namespace: NS.into(),
        }]
        .into_iter()
        .collect();

        let index = TypeIndex::resolve(tags, &catalog());
        let schema = index.schema_for("Eierforhold").unwrap();
        assert_eq!(schema.type_name.as_deref(), Some("Eierforhold"));
        assert_eq!(schema.namespace.as_deref(), Some(NS));
        assert!(schema.field("eier").is_some());
    }
}
