//! Selective resolution: only tagged nodes are touched.
//!
//! Person nodes are enriched from the registries and redacted according to
//! their contact policy. Children are handled before their parent so a
//! parent's metadata never sees half-processed descendants.

use serde_json::{Map, Value};

use crate::config::{
    ATTRIBUTE_KEY, BUSINESS_PROFILE_KEY, BUSINESS_REGISTRY_NAME, CANNOT_CONTACT_FLAG,
    DISSOLVED_FLAG, HANDLE_MANUALLY_FLAG, POPULATION_PROFILE_KEY, SUPPRESSED_ADDRESS_FIELDS,
};
use crate::error::{ResolverError, Result};
use crate::resolve::context::ResolutionContext;
use crate::resolve::policy::EntityVariant;
use crate::resolve::tree::{
    attach_profile, attribute_bag_is_redundant, declared_type, identifier, prepend_metadata,
    set_flag, type_metadata,
};
use crate::resolve::BoxFuture;

impl<'p> ResolutionContext<'p> {
    /// Walk `slot` and everything below it, children first.
    pub(crate) fn visit<'a>(&'a mut self, slot: &'a mut Value) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            match slot {
                Value::Array(items) => {
                    for item in items.iter_mut() {
                        self.visit(item).await?;
                    }
                }
                Value::Object(node) => {
                    for (_, child) in node.iter_mut() {
                        self.visit(child).await?;
                    }
                    self.apply_type_tag(node).await?;
                }
                _ => {}
            }
            Ok(())
        })
    }

    async fn apply_type_tag(&mut self, node: &mut Map<String, Value>) -> Result<()> {
        let Some(type_name) = declared_type(node).map(str::to_string) else {
            return Ok(());
        };

        match EntityVariant::from_type_name(&type_name) {
            Some(EntityVariant::LegalEntity) => self.enrich_company(node).await?,
            Some(EntityVariant::NaturalPerson) => self.enrich_person(node).await?,
            None => {}
        }

        let namespace = self.index().namespace_of(&type_name);
        prepend_metadata(node, type_metadata(&type_name, namespace));

        if attribute_bag_is_redundant(node) {
            node.shift_remove(ATTRIBUTE_KEY);
        }
        Ok(())
    }

    async fn enrich_company(&mut self, node: &mut Map<String, Value>) -> Result<()> {
        let Some(org_number) = identifier(node) else {
            return Ok(());
        };

        let record = self
            .legal_entity(&org_number)
            .await
            .map_err(|e| ResolverError::external(BUSINESS_REGISTRY_NAME, e))?;

        if let Some(profile) = &record.profile {
            attach_profile(node, BUSINESS_PROFILE_KEY, profile)?;
        }
        if record.dissolved {
            tracing::debug!(org_number = %org_number, "Organization is dissolved");
            set_flag(node, DISSOLVED_FLAG);
        }
        Ok(())
    }

    async fn enrich_person(&mut self, node: &mut Map<String, Value>) -> Result<()> {
        let Some(ssn) = identifier(node) else {
            return Ok(());
        };

        let record = match self.person(&ssn).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Freg lookup failed, person left unenriched");
                return Ok(());
            }
        };

        if let Some(profile) = &record.profile {
            attach_profile(node, POPULATION_PROFILE_KEY, profile)?;
        }
        if record.contactable == Some(false) {
            set_flag(node, CANNOT_CONTACT_FLAG);
        }
        if record.must_handle_manually {
            set_flag(node, HANDLE_MANUALLY_FLAG);
        }
        if record.policy.suppresses_address() {
            for field in SUPPRESSED_ADDRESS_FIELDS {
                node.shift_remove(field);
            }
        }
        Ok(())
    }
}
