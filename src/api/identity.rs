//! Identity service client speaking the `accounts:*` REST surface (hosted
//! identity toolkits and their local emulators). It is the single writer of
//! the session channel and keeps the id token in memory only.

use crate::api::{base_url, client, endpoint, error_message};
use crate::auth::{ProviderError, Session, SessionProvider, SessionState, SessionStore};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};
use tokio::sync::watch;
use tracing::{Instrument, debug, info_span, instrument};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

/// Maps service error codes to text fit for the form.
#[must_use]
pub fn readable_error(code: &str) -> String {
    // Codes may carry a detail suffix: "WEAK_PASSWORD : Password should be ..."
    let (code, detail) = match code.split_once(" : ") {
        Some((code, detail)) => (code.trim(), Some(detail.trim())),
        None => (code.trim(), None),
    };

    let message = match code {
        "EMAIL_EXISTS" => "The email address is already in use by another account.",
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password."
        }
        "INVALID_EMAIL" => "The email address is badly formatted.",
        "USER_DISABLED" => "This account has been disabled.",
        "OPERATION_NOT_ALLOWED" => "Password sign-in is disabled for this project.",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts, try again later.",
        "WEAK_PASSWORD" => detail.unwrap_or("The password is too weak."),
        _ => return detail.map_or_else(|| code.to_string(), ToString::to_string),
    };

    message.to_string()
}

pub struct IdentityClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    id_token: Mutex<Option<SecretString>>,
    store: SessionStore,
}

impl std::fmt::Debug for IdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("id_token", &"***")
            .field("session", &self.store.current())
            .finish()
    }
}

impl IdentityClient {
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(
        identity_url: &str,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: client(timeout)?,
            base_url: base_url(identity_url)?,
            api_key,
            id_token: Mutex::new(None),
            store: SessionStore::new(),
        })
    }

    fn set_token(&self, token: Option<SecretString>) {
        *self.id_token.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    async fn accounts(&self, operation: &str, body: &Value) -> Result<Value, ProviderError> {
        let url = endpoint(&self.base_url, &format!("/v1/accounts:{operation}"));

        let span = info_span!(
            "identity.accounts",
            http.method = "POST",
            operation = operation
        );
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(body)
            .send()
            .instrument(span)
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let code = error_message(response).await;
            debug!("accounts:{operation} - {status}, {code}");
            return Err(ProviderError::Rejected(readable_error(&code)));
        }

        Ok(response.json().await?)
    }

    async fn password_request(
        &self,
        operation: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, ProviderError> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
            "returnSecureToken": true,
        });

        let account: AccountResponse = serde_json::from_value(self.accounts(operation, &body).await?)
            .map_err(|e| ProviderError::Response(format!("accounts:{operation}: {e}")))?;

        let session = Session {
            uid: account.local_id,
            email: account.email,
        };

        self.set_token(Some(SecretString::from(account.id_token)));
        self.store.publish(Some(session.clone()));

        Ok(session)
    }
}

#[async_trait]
impl SessionProvider for IdentityClient {
    #[instrument(skip_all)]
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, ProviderError> {
        self.password_request("signUp", email, password).await
    }

    #[instrument(skip_all)]
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, ProviderError> {
        self.password_request("signInWithPassword", email, password).await
    }

    /// Sign-out is local: the token is dropped and the session cleared.
    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.set_token(None);
        self.store.publish(None);
        Ok(())
    }

    #[instrument(skip_all)]
    async fn refresh(&self) -> Result<(), ProviderError> {
        let Some(token) = self.id_token() else {
            self.store.publish(None);
            return Ok(());
        };

        let body = json!({ "idToken": token.expose_secret() });
        let result = match self.accounts("lookup", &body).await {
            Ok(value) => serde_json::from_value::<LookupResponse>(value)
                .map_err(|e| ProviderError::Response(format!("accounts:lookup: {e}"))),
            Err(err) => Err(err),
        };

        match result {
            Ok(lookup) => {
                let session = lookup.users.into_iter().next().map(|user| Session {
                    uid: user.local_id,
                    email: user.email,
                });
                if session.is_none() {
                    self.set_token(None);
                }
                self.store.publish(session);
                Ok(())
            }
            Err(ProviderError::Rejected(reason)) => {
                debug!("stored token rejected: {reason}");
                self.set_token(None);
                self.store.publish(None);
                Ok(())
            }
            Err(err) => {
                self.store.publish(None);
                Err(err)
            }
        }
    }

    fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    fn id_token(&self) -> Option<SecretString> {
        self.id_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::net::TcpListener;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn identity(server: &MockServer) -> Result<IdentityClient> {
        Ok(IdentityClient::new(
            &server.uri(),
            SecretString::from("api-key".to_string()),
            Duration::from_secs(5),
        )?)
    }

    fn password() -> SecretString {
        SecretString::from("secret1".to_string())
    }

    #[test]
    fn readable_error_maps_known_codes() {
        assert_eq!(
            readable_error("EMAIL_EXISTS"),
            "The email address is already in use by another account."
        );
        assert_eq!(
            readable_error("WEAK_PASSWORD : Password should be at least 6 characters"),
            "Password should be at least 6 characters"
        );
        assert_eq!(readable_error("INVALID_LOGIN_CREDENTIALS"), "Invalid email or password.");
        assert_eq!(readable_error("SOMETHING_NEW"), "SOMETHING_NEW");
    }

    #[tokio::test]
    async fn create_account_publishes_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signUp"))
            .and(query_param("key", "api-key"))
            .and(body_partial_json(json!({
                "email": "jane@example.com",
                "password": "secret1",
                "returnSecureToken": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "uid-123",
                "email": "jane@example.com",
                "idToken": "id-token",
                "refreshToken": "refresh-token",
                "expiresIn": "3600"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let identity = identity(&server)?;
        let rx = identity.subscribe();
        let session = identity.create_account("jane@example.com", &password()).await?;

        assert_eq!(session.uid, "uid-123");
        assert_eq!(rx.borrow().session(), Some(&session));
        assert_eq!(
            identity.id_token().map(|t| t.expose_secret().to_string()),
            Some("id-token".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn create_account_maps_email_exists() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signUp"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "EMAIL_EXISTS", "errors": []}
            })))
            .mount(&server)
            .await;

        let identity = identity(&server)?;
        let result = identity.create_account("jane@example.com", &password()).await;

        match result {
            Err(ProviderError::Rejected(message)) => {
                assert!(message.contains("already in use"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(identity.subscribe().borrow().is_loading());
        assert!(identity.id_token().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_then_sign_out_clears_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "uid-9",
                "email": "a@b.com",
                "idToken": "id-token",
                "registered": true
            })))
            .mount(&server)
            .await;

        let identity = identity(&server)?;
        identity.sign_in("a@b.com", &password()).await?;
        assert!(identity.subscribe().borrow().session().is_some());

        identity.sign_out().await?;
        assert_eq!(*identity.subscribe().borrow(), SessionState::Resolved(None));
        assert!(identity.id_token().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn refresh_without_token_resolves_to_none() -> Result<()> {
        let identity = IdentityClient::new(
            "http://127.0.0.1:9",
            SecretString::from("api-key".to_string()),
            Duration::from_secs(1),
        )?;
        assert!(identity.subscribe().borrow().is_loading());

        identity.refresh().await?;
        assert_eq!(*identity.subscribe().borrow(), SessionState::Resolved(None));
        Ok(())
    }

    #[tokio::test]
    async fn refresh_transport_failure_resolves_to_none() -> Result<()> {
        // Reserve a port, then free it so the connection is refused.
        let Ok(listener) = TcpListener::bind("127.0.0.1:0") else {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        };
        let address = listener.local_addr()?;
        drop(listener);

        let identity = IdentityClient::new(
            &format!("http://{address}"),
            SecretString::from("api-key".to_string()),
            Duration::from_secs(1),
        )?;
        identity.set_token(Some(SecretString::from("id-token".to_string())));

        let result = identity.refresh().await;

        assert!(matches!(result, Err(ProviderError::Transport(_))));
        assert_eq!(*identity.subscribe().borrow(), SessionState::Resolved(None));
        Ok(())
    }

    #[tokio::test]
    async fn refresh_with_rejected_token_signs_out() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "uid-9",
                "email": "a@b.com",
                "idToken": "id-token"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:lookup"))
            .and(body_partial_json(json!({"idToken": "id-token"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "INVALID_ID_TOKEN"}
            })))
            .mount(&server)
            .await;

        let identity = identity(&server)?;
        identity.sign_in("a@b.com", &password()).await?;
        identity.refresh().await?;

        assert_eq!(*identity.subscribe().borrow(), SessionState::Resolved(None));
        assert!(identity.id_token().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn refresh_with_valid_token_keeps_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "uid-9",
                "email": "a@b.com",
                "idToken": "id-token"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{"localId": "uid-9", "email": "a@b.com"}]
            })))
            .mount(&server)
            .await;

        let identity = identity(&server)?;
        identity.sign_in("a@b.com", &password()).await?;
        identity.refresh().await?;

        assert_eq!(
            identity.subscribe().borrow().session().map(|s| s.uid.clone()),
            Some("uid-9".to_string())
        );
        Ok(())
    }
}
