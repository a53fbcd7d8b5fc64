//! HTTP client wrapper for the identity registries.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::RegistryError;

/// User agent string identifying this resolver.
const USER_AGENT: &str = concat!("matrikkel-resolver/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::Client` configured with the given timeout and user agent.
pub fn create_client(timeout_secs: u64) -> Result<Client, RegistryError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Append path segments to a base URL, percent-encoding each segment.
///
/// # Examples
/// ```
/// use matrikkel_resolver::http::endpoint;
///
/// let url = endpoint("https://data.brreg.no/", &["enhetsregisteret", "api", "enheter", "912345678"]).unwrap();
/// assert_eq!(url.as_str(), "https://data.brreg.no/enhetsregisteret/api/enheter/912345678");
/// ```
pub fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, RegistryError> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| RegistryError::InvalidUrl(format!("{base_url} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// GET a JSON document, mapping the given statuses to "not found".
///
/// Registry lookups are not retried here; a failure is reported to the
/// resolution pass, which decides whether it is fatal.
pub async fn fetch_optional_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    not_found: &[StatusCode],
) -> Result<Option<T>, RegistryError> {
    // The path carries the identifier being looked up; only the host is logged.
    let host = url.host_str().unwrap_or_default().to_string();
    let response = client.get(url).send().await.map_err(|e| e.without_url())?;
    let status = response.status();

    if not_found.contains(&status) {
        tracing::debug!(host = %host, status = %status, "Registry has no match");
        return Ok(None);
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        tracing::warn!(host = %host, status = %status, "Registry returned an error");
        return Err(RegistryError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await.map_err(|e| e.without_url())?;
    let value = serde_json::from_slice(&bytes).map_err(|e| RegistryError::Decode(e.to_string()))?;
    Ok(Some(value))
}
