//! Configuration constants and registry client configuration.

use crate::error::{ResolverError, Result};

/// Qualified name of the attribute carrying a node's declared variant.
pub const TYPE_ATTRIBUTE: &str = "xsi:type";

/// Namespace URI of the `xsi` prefix.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Key of the attribute bag in the JSON tree.
pub const ATTRIBUTE_KEY: &str = "$";

/// Key of an element's text when it also carries attributes or children.
pub const TEXT_KEY: &str = "_";

/// Reserved metadata keys added by resolution.
pub const TYPE_KEY: &str = "_type";
pub const NAMESPACE_KEY: &str = "_namespace";

/// Key wrapping a scalar after deep resolution.
pub const VALUE_KEY: &str = "value";

/// Sentinel for type identity that could not be resolved.
pub const UNRESOLVED: &str = "unresolved";

/// Variant name of organizations in the Matrikkel domain model.
pub const LEGAL_ENTITY_VARIANT: &str = "JuridiskPerson";

/// Variant name of individuals in the Matrikkel domain model.
pub const NATURAL_PERSON_VARIANT: &str = "FysiskPerson";

/// Field holding the organization or national identity number of a person node.
pub const IDENTIFIER_FIELD: &str = "nummer";

/// Field the business registry profile is attached under.
pub const BUSINESS_PROFILE_KEY: &str = "brreg";

/// Field the population registry profile is attached under.
pub const POPULATION_PROFILE_KEY: &str = "freg";

/// Flags written onto enriched nodes.
pub const DISSOLVED_FLAG: &str = "avviklet";
pub const CANNOT_CONTACT_FLAG: &str = "kanIkkeKontaktes";
pub const HANDLE_MANUALLY_FLAG: &str = "handleManually";

/// Address fields removed from persons with a confidential address.
pub const SUPPRESSED_ADDRESS_FIELDS: [&str; 2] = ["bostedsadresse", "postadresse"];

/// Population registry status of persons that are no longer active.
pub const INACTIVE_STATUS: &str = "inaktiv";

/// Attribute name (or `xmlns:` prefix) of namespace declarations in the bag.
pub const NAMESPACE_DECLARATION: &str = "xmlns";

/// Maximum depth a catalog type is expanded into nested field schemas.
pub const MAX_SCHEMA_DEPTH: usize = 16;

/// Display names used in external-service errors.
pub const BUSINESS_REGISTRY_NAME: &str = "Brønnøysundregistrene";
pub const POPULATION_REGISTRY_NAME: &str = "Folkeregisteret";

/// Public base URL of Enhetsregisteret.
pub const DEFAULT_BRREG_BASE_URL: &str = "https://data.brreg.no";

/// HTTP timeout in seconds for registry requests.
pub const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the two identity registries.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub brreg_base_url: String,
    pub freg_base_url: String,
    pub timeout_secs: u64,
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let brreg_base_url = std::env::var("BRREG_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BRREG_BASE_URL.into());

        let freg_base_url = std::env::var("FREG_API_BASE_URL")
            .map_err(|_| ResolverError::Config("FREG_API_BASE_URL not set".into()))?;

        let timeout_secs = std::env::var("REGISTRY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REGISTRY_TIMEOUT_SECS);

        Ok(Self {
            brreg_base_url,
            freg_base_url,
            timeout_secs,
        })
    }

    /// Create a config builder for testing.
    pub fn builder(freg_base_url: impl Into<String>) -> RegistryConfigBuilder {
        RegistryConfigBuilder {
            brreg_base_url: DEFAULT_BRREG_BASE_URL.into(),
            freg_base_url: freg_base_url.into(),
            timeout_secs: DEFAULT_REGISTRY_TIMEOUT_SECS,
        }
    }
}

/// Builder for constructing `RegistryConfig` in tests.
pub struct RegistryConfigBuilder {
    brreg_base_url: String,
    freg_base_url: String,
    timeout_secs: u64,
}

impl RegistryConfigBuilder {
    pub fn brreg_base_url(mut self, brreg_base_url: impl Into<String>) -> Self {
        self.brreg_base_url = brreg_base_url.into();
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn build(self) -> RegistryConfig {
        RegistryConfig {
            brreg_base_url: self.brreg_base_url,
            freg_base_url: self.freg_base_url,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = RegistryConfig::builder("http://freg.local").build();
        assert_eq!(config.brreg_base_url, DEFAULT_BRREG_BASE_URL);
        assert_eq!(config.freg_base_url, "http://freg.local");
        assert_eq!(config.timeout_secs, DEFAULT_REGISTRY_TIMEOUT_SECS);
    }

    #[test]
    fn test_builder_overrides() {
        let config = RegistryConfig::builder("http://freg.local")
            .brreg_base_url("http://brreg.local")
            .timeout_secs(5)
            .build();
        assert_eq!(config.brreg_base_url, "http://brreg.local");
        assert_eq!(config.timeout_secs, 5);
    }
}
