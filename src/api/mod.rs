//! REST adapters for the hosted identity service and document store. They
//! centralize the HTTP client, endpoint building and error extraction so the
//! auth flows never see transport details.

pub mod documents;
pub mod identity;

pub use documents::DocumentClient;
pub use identity::IdentityClient;

use crate::auth::ProviderError;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub(crate) fn client(timeout: Duration) -> Result<Client, ProviderError> {
    Ok(Client::builder()
        .user_agent(crate::APP_USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Validates `base` and returns it without a trailing slash.
///
/// # Errors
/// Returns an error if `base` cannot be parsed, has no host, or is not HTTP(S).
pub fn base_url(base: &str) -> Result<String, ProviderError> {
    let url = Url::parse(base).map_err(|e| ProviderError::Config(format!("{base}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ProviderError::Config(format!(
                "{base}: unsupported scheme {scheme}"
            )))
        }
    }

    if url.host().is_none() {
        return Err(ProviderError::Config(format!("{base}: no host specified")));
    }

    Ok(base.trim_end_matches('/').to_string())
}

pub(crate) fn endpoint(base: &str, path: &str) -> String {
    let endpoint = format!("{base}{path}");
    debug!("endpoint URL: {}", endpoint);
    endpoint
}

/// Extracts `error.message` from a service error body.
pub(crate) fn service_error_message(json_response: &Value) -> &str {
    json_response
        .get("error")
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Turns a non-success response into the service's error message.
pub(crate) async fn error_message(response: Response) -> String {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    let message = service_error_message(&body);
    if message.is_empty() {
        status.to_string()
    } else {
        message.to_string()
    }
}
