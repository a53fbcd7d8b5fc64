//! Exhaustive resolution: every node gets `_type` / `_namespace`.
//!
//! The walk threads the enclosing schema through recursion. A node's declared
//! variant overrides whatever the enclosing schema expects at that position;
//! otherwise the enclosing schema's field of the same name applies. Nodes no
//! schema reaches are annotated `unresolved`. Nothing in this walk can fail:
//! registry errors are logged per node.

use serde_json::{Map, Value};

use crate::config::{
    BUSINESS_PROFILE_KEY, LEGAL_ENTITY_VARIANT, NAMESPACE_KEY, TYPE_KEY, UNRESOLVED, VALUE_KEY,
};
use crate::resolve::context::ResolutionContext;
use crate::resolve::tree::{
    attach_profile, declared_type, identifier, is_absent, is_attachment_key, is_reserved_key,
    prepend_metadata, type_metadata,
};
use crate::resolve::BoxFuture;
use crate::schema::ResolvedSchema;

impl<'p> ResolutionContext<'p> {
    /// Resolve one response item `{ <responseName>: { ...fields } }` in place.
    pub(crate) async fn deep_resolve_item(&mut self, item: &mut Value) {
        let Value::Object(response) = item else {
            return;
        };
        let Some((name, data)) = response
            .iter_mut()
            .find(|(key, _)| !is_reserved_key(key))
        else {
            return;
        };
        let Value::Object(fields) = data else {
            return;
        };

        let schema = self.index().schema_for(name);
        tracing::debug!(response = %name, resolved = schema.is_some(), "Resolving response");

        for (key, child) in fields.iter_mut() {
            if is_reserved_key(key) {
                continue;
            }
            self.annotate(child, key, schema).await;
        }
    }

    /// Annotate `slot` (found under `key`) and everything below it.
    fn annotate<'a>(
        &'a mut self,
        slot: &'a mut Value,
        key: &'a str,
        enclosing: Option<&'p ResolvedSchema>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            if is_absent(slot) || is_attachment_key(key) {
                return;
            }

            if let Value::Array(items) = slot {
                for item in items.iter_mut() {
                    self.annotate(item, key, enclosing).await;
                }
                return;
            }

            let index = self.index();
            let declared = match slot {
                Value::Object(node) => declared_type(node).map(str::to_string),
                _ => None,
            };
            let active = declared
                .as_deref()
                .and_then(|type_name| index.schema_for(type_name))
                .or_else(|| enclosing.and_then(|schema| schema.field(key)));

            let type_name = active
                .and_then(|schema| schema.type_name.as_deref())
                .unwrap_or(UNRESOLVED);
            let namespace = active
                .and_then(|schema| schema.namespace.as_deref())
                .unwrap_or(UNRESOLVED);

            match slot {
                Value::Object(node) => {
                    if declared.as_deref() == Some(LEGAL_ENTITY_VARIANT) {
                        self.enrich_legal_entity(node).await;
                    }
                    prepend_metadata(node, type_metadata(type_name, Some(namespace)));

                    for (child_key, child) in node.iter_mut() {
                        if is_reserved_key(child_key) {
                            continue;
                        }
                        self.annotate(child, child_key, active).await;
                    }
                }
                scalar => {
                    let mut wrapped = Map::new();
                    wrapped.insert(TYPE_KEY.to_string(), Value::String(type_name.to_string()));
                    wrapped.insert(NAMESPACE_KEY.to_string(), Value::String(namespace.to_string()));
                    wrapped.insert(VALUE_KEY.to_string(), scalar.take());
                    *scalar = Value::Object(wrapped);
                }
            }
        })
    }

    /// Attach the business registry profile, logging instead of failing.
    async fn enrich_legal_entity(&mut self, node: &mut Map<String, Value>) {
        let Some(org_number) = identifier(node) else {
            return;
        };

        match self.legal_entity(&org_number).await {
            Ok(record) => {
                if let Some(profile) = &record.profile {
                    if let Err(e) = attach_profile(node, BUSINESS_PROFILE_KEY, profile) {
                        tracing::warn!(org_number = %org_number, error = %e, "Could not attach Brreg profile");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    org_number = %org_number,
                    error = %e,
                    "Brreg lookup failed, continuing without enrichment"
                );
            }
        }
    }
}
