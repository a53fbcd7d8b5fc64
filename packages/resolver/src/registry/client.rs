use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::http::{create_client, endpoint, fetch_optional_json};
use crate::registry::types::{CompanyProfile, PersonProfile, ProfileScope};

/// Lookup of organizations by organization number.
#[async_trait]
pub trait BusinessRegistry: Send + Sync {
    async fn lookup_by_org_number(
        &self,
        org_number: &str,
    ) -> Result<Option<CompanyProfile>, RegistryError>;
}

/// Lookup of persons by national identity number.
#[async_trait]
pub trait PopulationRegistry: Send + Sync {
    async fn lookup_by_ssn(
        &self,
        ssn: &str,
        scope: ProfileScope,
    ) -> Result<Option<PersonProfile>, RegistryError>;
}

/// Enhetsregisteret client (Brønnøysundregistrene open data API).
#[derive(Debug, Clone)]
pub struct BrregClient {
    http: Client,
    base_url: String,
}

impl BrregClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Ok(Self {
            http: create_client(config.timeout_secs)?,
            base_url: config.brreg_base_url.clone(),
        })
    }
}

#[async_trait]
impl BusinessRegistry for BrregClient {
    async fn lookup_by_org_number(
        &self,
        org_number: &str,
    ) -> Result<Option<CompanyProfile>, RegistryError> {
        let url = endpoint(
            &self.base_url,
            &["enhetsregisteret", "api", "enheter", org_number],
        )?;
        tracing::debug!(org_number, "Looking up organization in Brreg");
        // 410 Gone is returned for units removed for legal reasons
        fetch_optional_json(&self.http, url, &[StatusCode::NOT_FOUND, StatusCode::GONE]).await
    }
}

/// Folkeregisteret client.
#[derive(Debug, Clone)]
pub struct FregClient {
    http: Client,
    base_url: String,
}

impl FregClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Ok(Self {
            http: create_client(config.timeout_secs)?,
            base_url: config.freg_base_url.clone(),
        })
    }
}

#[async_trait]
impl PopulationRegistry for FregClient {
    async fn lookup_by_ssn(
        &self,
        ssn: &str,
        scope: ProfileScope,
    ) -> Result<Option<PersonProfile>, RegistryError> {
        let mut url = endpoint(&self.base_url, &["person", ssn])?;
        url.query_pairs_mut()
            .append_pair("full", &scope.is_full().to_string())
            .append_pair("light", &scope.is_light().to_string());
        tracing::debug!(?scope, "Looking up person in Freg");
        fetch_optional_json(&self.http, url, &[StatusCode::NOT_FOUND]).await
    }
}
