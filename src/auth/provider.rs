//! Seams to the hosted identity service and document store. The flows only
//! see these traits; REST adapters live in `crate::api`.

use crate::auth::types::{Profile, Session, SessionState};
use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The service refused the request; the message is safe to show.
    #[error("{0}")]
    Rejected(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Response(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Holds the single writable end of the session channel.
///
/// Not `Clone`: whoever owns the store is the only writer. Readers call
/// [`SessionStore::subscribe`].
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::Loading);
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Resolves the session, waking every reader.
    pub fn publish(&self, session: Option<Session>) {
        self.tx.send_replace(SessionState::Resolved(session));
    }

    #[must_use]
    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }
}

/// Identity service: account creation, password sign-in, sign-out and
/// continuous observation of the current session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Creates the account and signs it in.
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, ProviderError>;

    async fn sign_in(&self, email: &str, password: &SecretString)
        -> Result<Session, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Re-queries the current session and publishes the answer. The state
    /// must leave `Loading` even when this returns an error.
    async fn refresh(&self) -> Result<(), ProviderError>;

    fn subscribe(&self) -> watch::Receiver<SessionState>;

    /// Bearer token of the signed-in account, if any.
    fn id_token(&self) -> Option<SecretString>;
}

/// Document store used for profile records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Writes `profile` authorized as the account that owns `token`.
    async fn write(
        &self,
        collection: &str,
        key: &str,
        profile: &Profile,
        token: Option<&SecretString>,
    ) -> Result<(), ProviderError>;
}
