//! URL liveness probing.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use citegraph_store::ResourceStatus;

/// Probe a URL with a HEAD request and classify the outcome.
///
/// Redirects are followed (reqwest's default policy). A pure function of
/// (url, timeout): never touches the graph, never returns an error —
/// network failures classify as [`ResourceStatus::Error`].
pub async fn classify(client: &Client, url: &str, timeout: Duration) -> ResourceStatus {
    let status = match client.head(url).timeout(timeout).send().await {
        Ok(response) => match response.status().as_u16() {
            200 => ResourceStatus::Accessible,
            401 | 403 => ResourceStatus::Unauthorized,
            404 => ResourceStatus::NotFound,
            code => ResourceStatus::Other(code),
        },
        Err(_) => ResourceStatus::Error,
    };
    debug!("Probed {} -> {}", url, status);
    status
}

/// Host component of a URL, or `"unknown"` when it has none.
pub fn resource_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}
