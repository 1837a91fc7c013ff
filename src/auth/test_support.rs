//! In-memory collaborators for flow and gate tests.

use crate::auth::provider::{ProfileStore, ProviderError, SessionProvider, SessionStore};
use crate::auth::types::{Profile, Session, SessionState};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::{Notify, watch};

pub(crate) fn session(email: &str) -> Session {
    Session {
        uid: format!("uid-{email}"),
        email: email.to_string(),
    }
}

/// Session provider that accepts or rejects every call.
pub(crate) struct FakeProvider {
    store: SessionStore,
    reject_with: Option<String>,
    fail_sign_out: bool,
    token: Mutex<Option<SecretString>>,
    pub(crate) sign_out_calls: AtomicUsize,
}

impl FakeProvider {
    pub(crate) fn accepting() -> Self {
        Self {
            store: SessionStore::new(),
            reject_with: None,
            fail_sign_out: false,
            token: Mutex::new(None),
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::accepting()
        }
    }

    pub(crate) fn failing_sign_out() -> Self {
        Self {
            fail_sign_out: true,
            ..Self::accepting()
        }
    }

    pub(crate) fn publish(&self, session: Option<Session>) {
        self.store.publish(session);
    }

    pub(crate) fn current(&self) -> SessionState {
        self.store.current()
    }

    fn set_token(&self, token: Option<SecretString>) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn outcome(&self, email: &str) -> Result<Session, ProviderError> {
        if let Some(message) = &self.reject_with {
            return Err(ProviderError::Rejected(message.clone()));
        }
        let session = session(email);
        self.set_token(Some(SecretString::from(format!("token-{email}"))));
        self.store.publish(Some(session.clone()));
        Ok(session)
    }
}

#[async_trait]
impl SessionProvider for FakeProvider {
    async fn create_account(
        &self,
        email: &str,
        _password: &SecretString,
    ) -> Result<Session, ProviderError> {
        self.outcome(email)
    }

    async fn sign_in(
        &self,
        email: &str,
        _password: &SecretString,
    ) -> Result<Session, ProviderError> {
        self.outcome(email)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out {
            return Err(ProviderError::Response("sign out unavailable".to_string()));
        }
        self.set_token(None);
        self.store.publish(None);
        Ok(())
    }

    async fn refresh(&self) -> Result<(), ProviderError> {
        if self.store.current().is_loading() {
            self.store.publish(None);
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    fn id_token(&self) -> Option<SecretString> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub(crate) enum ProfileBehavior {
    Succeed,
    Fail,
    /// Blocks until `release` is notified.
    Hold,
}

/// Recorded write: collection, key, profile and the bearer token used.
pub(crate) type Written = (String, String, Profile, Option<String>);

pub(crate) struct FakeProfiles {
    behavior: ProfileBehavior,
    pub(crate) release: Notify,
    pub(crate) attempts: AtomicUsize,
    pub(crate) written: Mutex<Vec<Written>>,
}

impl FakeProfiles {
    pub(crate) fn new(behavior: ProfileBehavior) -> Self {
        Self {
            behavior,
            release: Notify::new(),
            attempts: AtomicUsize::new(0),
            written: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn written(&self) -> Vec<Written> {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ProfileStore for FakeProfiles {
    async fn write(
        &self,
        collection: &str,
        key: &str,
        profile: &Profile,
        token: Option<&SecretString>,
    ) -> Result<(), ProviderError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            ProfileBehavior::Fail => {
                return Err(ProviderError::Rejected(
                    "Missing or insufficient permissions.".to_string(),
                ))
            }
            ProfileBehavior::Hold => self.release.notified().await,
            ProfileBehavior::Succeed => {}
        }
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((
                collection.to_string(),
                key.to_string(),
                profile.clone(),
                token.map(|t| t.expose_secret().to_string()),
            ));
        Ok(())
    }
}
