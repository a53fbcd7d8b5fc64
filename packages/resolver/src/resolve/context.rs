//! Per-pass resolution state.
//!
//! A [`ResolutionContext`] is created when a resolve call starts and dropped
//! when it returns. It holds the pass's type index and the two enrichment
//! caches, so the same identifier never reaches a registry twice within one
//! pass and nothing is remembered across passes.

use std::collections::HashMap;

use crate::error::RegistryError;
use crate::registry::{BusinessRegistry, PopulationRegistry, ProfileScope};
use crate::resolve::policy::{LegalEntityRecord, PersonRecord};
use crate::schema::TypeIndex;

/// The registries a pass may consult.
#[derive(Clone, Copy)]
pub struct Registries<'a> {
    pub business: &'a dyn BusinessRegistry,
    pub population: &'a dyn PopulationRegistry,
}

pub struct ResolutionContext<'p> {
    index: &'p TypeIndex,
    registries: Registries<'p>,
    legal_entities: HashMap<String, LegalEntityRecord>,
    persons: HashMap<String, PersonRecord>,
}

impl<'p> ResolutionContext<'p> {
    pub fn new(index: &'p TypeIndex, registries: Registries<'p>) -> Self {
        Self {
            index,
            registries,
            legal_entities: HashMap::new(),
            persons: HashMap::new(),
        }
    }

    pub fn index(&self) -> &'p TypeIndex {
        self.index
    }

    /// Business registry record for an organization number.
    ///
    /// Answers, including "not found", are cached for the rest of the pass.
    /// Failures are not cached.
    pub async fn legal_entity(
        &mut self,
        org_number: &str,
    ) -> Result<LegalEntityRecord, RegistryError> {
        if let Some(record) = self.legal_entities.get(org_number) {
            tracing::debug!(org_number, "Brreg cache hit");
            return Ok(record.clone());
        }

        let profile = self
            .registries
            .business
            .lookup_by_org_number(org_number)
            .await?;
        let record = LegalEntityRecord::from_lookup(profile);
        self.legal_entities
            .insert(org_number.to_string(), record.clone());
        Ok(record)
    }

    /// Population registry record (light profile) for a national identity number.
    pub async fn person(&mut self, ssn: &str) -> Result<PersonRecord, RegistryError> {
        if let Some(record) = self.persons.get(ssn) {
            tracing::debug!("Freg cache hit");
            return Ok(record.clone());
        }

        let profile = self
            .registries
            .population
            .lookup_by_ssn(ssn, ProfileScope::Light)
            .await?;
        let record = PersonRecord::from_lookup(profile);
        self.persons.insert(ssn.to_string(), record.clone());
        Ok(record)
    }

    /// Number of distinct organizations looked up so far.
    pub fn cached_legal_entities(&self) -> usize {
        self.legal_entities.len()
    }

    /// Number of distinct persons looked up so far.
    pub fn cached_persons(&self) -> usize {
        self.persons.len()
    }
}
