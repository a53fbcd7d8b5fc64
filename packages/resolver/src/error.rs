//! Error types for the resolver.
//!
//! Uses the dual-error pattern: `ResolverError` for library consumers, and
//! narrower `RegistryError` / `CatalogError` types for the collaborators that
//! the resolution engine decides to either propagate or log per node.

use thiserror::Error;

/// Main error type for the resolver library.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// An external registry could not be reached or answered with garbage.
    ///
    /// Only raised by the light resolution path, where a failing business
    /// registry aborts the whole pass.
    #[error("Dette er en ekstern feil: kunne ikke koble til {registry}\n{source}")]
    ExternalService {
        registry: &'static str,
        #[source]
        source: RegistryError,
    },

    /// Raw markup could not be parsed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The service answered with something that is not a SOAP response.
    #[error("The returned response from the Matrikkel API was invalid. The request might be unauthorized: {0}")]
    InvalidResponse(String),

    /// Schema catalog could not be loaded.
    #[error("Schema catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolverError {
    /// Wrap a registry failure as an external-service error.
    pub fn external(registry: &'static str, source: RegistryError) -> Self {
        Self::ExternalService { registry, source }
    }

    /// Whether the failure originates outside this process.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::ExternalService { .. })
    }
}

/// Errors raised by the identity registry clients.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Registry answered with an unexpected status.
    #[error("Registry returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Registry answered 2xx with a body that is not a profile.
    #[error("Failed to decode registry response: {0}")]
    Decode(String),

    /// Configured base URL cannot be used to build a request URL.
    #[error("Invalid registry URL: {0}")]
    InvalidUrl(String),
}

impl From<url::ParseError> for RegistryError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Errors raised by a schema catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog was queried before it finished loading.
    #[error("Schema catalog is not loaded")]
    NotLoaded,

    /// Lookup failed for a reason specific to the catalog implementation.
    #[error("Schema lookup failed for {namespace}:{type_name}: {message}")]
    Lookup {
        namespace: String,
        type_name: String,
        message: String,
    },

    /// Catalog file could not be read.
    #[error("Failed to read schema catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file is not valid JSON.
    #[error("Invalid schema catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolverError>;
