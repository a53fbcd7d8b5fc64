//! Type resolution and registry enrichment of converted responses.
//!
//! Two strategies run over the JSON form of a response:
//!
//! - **Deep** ([`Resolver::deep_resolve`]): every node is annotated with the
//!   `_type` / `_namespace` the schema catalog gives it, and legal entities are
//!   enriched from the business registry. Never fails.
//! - **Light** ([`Resolver::light_resolve`]): only nodes carrying an `xsi:type`
//!   are touched. Persons are enriched and redacted by their contact policy.
//!   A business registry failure fails the whole pass.
//!
//! Each call is one pass with its own [`ResolutionContext`]; nothing is shared
//! between passes.

mod context;
mod deep;
mod light;
mod policy;
mod tree;

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::Result;
use crate::registry::{BusinessRegistry, PopulationRegistry};
use crate::schema::{SchemaCatalog, TypeIndex};
use crate::xml::{self, envelope_body, extract_type_tags, into_items};

pub use context::{Registries, ResolutionContext};
pub use policy::{ContactPolicy, EntityVariant, LegalEntityRecord, PersonRecord};

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Entry point for resolution passes.
pub struct Resolver<'a> {
    catalog: &'a dyn SchemaCatalog,
    registries: Registries<'a>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        catalog: &'a dyn SchemaCatalog,
        business: &'a dyn BusinessRegistry,
        population: &'a dyn PopulationRegistry,
    ) -> Self {
        Self {
            catalog,
            registries: Registries {
                business,
                population,
            },
        }
    }

    /// Annotate every node of `tree` with its schema type.
    ///
    /// Returns `tree` unchanged when either argument is missing or the markup
    /// cannot be parsed. Otherwise returns the response items as an array.
    pub async fn deep_resolve(&self, raw: Option<&str>, tree: Option<Value>) -> Option<Value> {
        let Some(raw) = raw else {
            return tree;
        };
        let tree = tree?;

        let tags = match xml::parse(raw) {
            Ok(doc) => extract_type_tags(&doc),
            Err(e) => {
                tracing::warn!(error = %e, "Could not parse response markup, tree left unresolved");
                return Some(tree);
            }
        };
        let index = TypeIndex::resolve(tags, self.catalog);
        tracing::debug!(tags = index.tags().len(), "Deep resolution started");

        let mut items = into_items(envelope_body(tree));
        let mut ctx = ResolutionContext::new(&index, self.registries);
        for item in items.iter_mut() {
            ctx.deep_resolve_item(item).await;
        }

        tracing::debug!(
            items = items.len(),
            organizations = ctx.cached_legal_entities(),
            "Deep resolution finished"
        );
        Some(Value::Array(items))
    }

    /// Enrich and redact the tagged nodes of a copy of `tree`.
    ///
    /// `tree` itself is never modified. Returns `None` when either argument is
    /// missing.
    pub async fn light_resolve(&self, raw: Option<&str>, tree: Option<&Value>) -> Result<Option<Value>> {
        let (Some(raw), Some(tree)) = (raw, tree) else {
            return Ok(None);
        };

        let doc = xml::parse(raw)?;
        let index = TypeIndex::unresolved(extract_type_tags(&doc));
        tracing::debug!(tags = index.tags().len(), "Light resolution started");

        let mut result = match tree {
            Value::Array(_) => tree.clone(),
            other => Value::Array(vec![other.clone()]),
        };
        let mut ctx = ResolutionContext::new(&index, self.registries);
        ctx.visit(&mut result).await?;

        tracing::debug!(
            organizations = ctx.cached_legal_entities(),
            persons = ctx.cached_persons(),
            "Light resolution finished"
        );
        Ok(Some(result))
    }
}
