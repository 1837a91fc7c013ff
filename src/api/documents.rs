//! Document store client for profile records. Writes a document with typed
//! field values under `{collection}/{key}`, authorized with the signed-in
//! user's id token.

use crate::api::{base_url, client, error_message};
use crate::auth::{Profile, ProfileStore, ProviderError};
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;
use tracing::{Instrument, debug, info_span, instrument};
use url::Url;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
enum TypedValue {
    StringValue(String),
    NullValue(()),
    TimestampValue(String),
}

impl From<Option<String>> for TypedValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::NullValue(()), Self::StringValue)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileFields {
    full_name: TypedValue,
    user_name: TypedValue,
    email: TypedValue,
    phone: TypedValue,
    created_at: TypedValue,
}

#[derive(Debug, Serialize)]
struct Document {
    fields: ProfileFields,
}

impl From<&Profile> for Document {
    fn from(profile: &Profile) -> Self {
        Self {
            fields: ProfileFields {
                full_name: TypedValue::StringValue(profile.full_name.clone()),
                user_name: profile.user_name.clone().into(),
                email: TypedValue::StringValue(profile.email.clone()),
                phone: TypedValue::StringValue(profile.phone.clone()),
                created_at: TypedValue::TimestampValue(
                    profile.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                ),
            },
        }
    }
}

pub struct DocumentClient {
    client: Client,
    base_url: Url,
    project_id: String,
}

impl DocumentClient {
    /// # Errors
    /// Returns an error if the base URL is invalid, the project id is empty,
    /// or the HTTP client cannot be built.
    pub fn new(
        document_url: &str,
        project_id: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let project_id = project_id.trim();
        if project_id.is_empty() {
            return Err(ProviderError::Config("project id is empty".to_string()));
        }

        let base = base_url(document_url)?;
        let base_url =
            Url::parse(&base).map_err(|e| ProviderError::Config(format!("{base}: {e}")))?;

        Ok(Self {
            client: client(timeout)?,
            base_url,
            project_id: project_id.to_string(),
        })
    }

    /// Document URL with `collection` and `key` each encoded as one segment.
    fn document_url(&self, collection: &str, key: &str) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProviderError::Config(format!("{}: cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
                collection,
                key,
            ]);
        debug!("endpoint URL: {url}");
        Ok(url)
    }
}

#[async_trait]
impl ProfileStore for DocumentClient {
    #[instrument(skip(self, profile, token))]
    async fn write(
        &self,
        collection: &str,
        key: &str,
        profile: &Profile,
        token: Option<&SecretString>,
    ) -> Result<(), ProviderError> {
        let url = self.document_url(collection, key)?;

        let mut request = self.client.patch(url).json(&Document::from(profile));
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }

        let span = info_span!("documents.write", http.method = "PATCH");
        let response = request.send().instrument(span).await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = error_message(response).await;
            debug!("{collection}/{key} - {status}, {message}");
            return Err(ProviderError::Rejected(message));
        }

        Ok(())
    }
}
