//! Command-line interface for the resolver.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::config::{RegistryConfig, BUSINESS_REGISTRY_NAME, POPULATION_REGISTRY_NAME};
use crate::error::{CatalogError, ResolverError, Result};
use crate::flatten::{extract_items, flatten_object};
use crate::registry::{BrregClient, FregClient};
use crate::resolve::Resolver;
use crate::schema::InMemoryCatalog;
use crate::xml::{self, check_service_response, envelope_body, extract_type_tags, to_json};

/// Matrikkel Resolver - Resolve types and enrich persons in Matrikkel SOAP responses.
#[derive(Parser)]
#[command(name = "matrikkel-resolver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a saved SOAP response and print it as JSON.
    Resolve {
        /// Path to the raw SOAP response
        input: PathBuf,

        /// Resolution strategy
        #[arg(short, long, value_enum, default_value_t = Mode::Light)]
        mode: Mode,

        /// Schema catalog JSON file (deep mode)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Print one flat row per data item
        #[arg(short, long)]
        flatten: bool,
    },
    /// List the xsi:type tags declared in a SOAP response.
    Types {
        /// Path to the raw SOAP response
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Annotate every node with its schema type
    Deep,
    /// Enrich and redact typed persons only
    Light,
}

/// Run the CLI.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            input,
            mode,
            catalog,
            flatten,
        } => resolve_command(&input, mode, catalog.as_deref(), flatten).await,
        Commands::Types { input } => types_command(&input).await,
    }
}

async fn read_response(input: &Path) -> Result<String> {
    let raw = tokio::fs::read_to_string(input).await.map_err(|e| {
        ResolverError::Io(std::io::Error::new(
            e.kind(),
            format!("Could not read {}: {e}", input.display()),
        ))
    })?;
    check_service_response(&raw)?;
    Ok(raw)
}

/// Execute the resolve command.
async fn resolve_command(
    input: &Path,
    mode: Mode,
    catalog: Option<&Path>,
    flatten: bool,
) -> Result<()> {
    let raw = read_response(input).await?;
    let tree = to_json(&xml::parse(&raw)?);

    let catalog = match catalog {
        Some(path) => load_catalog(path).await?,
        None => InMemoryCatalog::new(),
    };
    let config = RegistryConfig::from_env()?;
    let business = BrregClient::new(&config)
        .map_err(|e| ResolverError::external(BUSINESS_REGISTRY_NAME, e))?;
    let population = FregClient::new(&config)
        .map_err(|e| ResolverError::external(POPULATION_REGISTRY_NAME, e))?;
    let resolver = Resolver::new(&catalog, &business, &population);

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Resolving response...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let resolved = match mode {
        Mode::Deep => resolver.deep_resolve(Some(&raw), Some(tree)).await,
        Mode::Light => {
            let body = envelope_body(tree);
            match resolver.light_resolve(Some(&raw), Some(&body)).await {
                Ok(resolved) => resolved,
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(e);
                }
            }
        }
    };
    pb.finish_and_clear();

    let mut output = resolved.unwrap_or(Value::Null);
    if flatten {
        let responses = match output {
            Value::Array(items) => items,
            other => vec![other],
        };
        output = Value::Array(
            extract_items(&responses)
                .iter()
                .map(|item| Value::Object(flatten_object(item)))
                .collect(),
        );
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn load_catalog(path: &Path) -> Result<InMemoryCatalog> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(CatalogError::from)?;
    let catalog = InMemoryCatalog::from_json_str(&content)?;
    tracing::debug!(path = %path.display(), "Schema catalog loaded");
    Ok(catalog)
}

/// Execute the types command.
async fn types_command(input: &Path) -> Result<()> {
    let raw = read_response(input).await?;
    let doc = xml::parse(&raw)?;
    let tags = extract_type_tags(&doc);

    if tags.is_empty() {
        println!("{}", style("No type tags found").yellow());
        return Ok(());
    }

    for tag in tags.iter() {
        println!("{} {}", style(&tag.type_name).cyan(), tag.namespace);
    }
    Ok(())
}
