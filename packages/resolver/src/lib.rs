//! Matrikkel Resolver - Schema-directed type resolution and registry enrichment
//! of Matrikkel SOAP responses.
//!
//! A response is read twice: once as markup, to collect the `xsi:type` tags and
//! the namespaces they are bound to, and once as a JSON tree that the resolvers
//! rewrite.
//!
//! # Example
//!
//! ```
//! use matrikkel_resolver::xml;
//!
//! let raw = r#"<svar xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
//!                    xmlns:d="urn:domain"><eier xsi:type="d:FysiskPerson"/></svar>"#;
//! let doc = xml::parse(raw).unwrap();
//! let tags = xml::extract_type_tags(&doc);
//! assert_eq!(tags.namespace_of("FysiskPerson"), Some("urn:domain"));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants and registry client configuration
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Parsing, type tag extraction and conversion to JSON
//! - [`schema`]: Schema catalog contract and the per-pass type index
//! - [`http`]: Shared HTTP client for the registries
//! - [`registry`]: Business and population registry clients
//! - [`resolve`]: Deep and light resolution passes
//! - [`flatten`]: One flat row per data item
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod flatten;
pub mod http;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod xml;

pub use config::RegistryConfig;
pub use error::{CatalogError, RegistryError, ResolverError, Result};
pub use registry::{BrregClient, BusinessRegistry, FregClient, PopulationRegistry};
pub use resolve::Resolver;
pub use schema::{InMemoryCatalog, ResolvedSchema, SchemaCatalog, TypeIndex};
