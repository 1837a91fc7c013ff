//! Registration, sign-in and logout orchestration. Each operation makes one
//! attempt; nothing here retries.

use crate::auth::{
    detached::{self, Detached},
    gate::SessionGate,
    provider::{ProfileStore, SessionProvider},
    types::{Credentials, Profile, Registration, Session},
};
use crate::routes::Route;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, instrument};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Shown next to the sign-up button; the user may resubmit.
    #[error("{0}")]
    RegistrationFailed(String),
    #[error("{0}")]
    SignInFailed(String),
    /// Logged only.
    #[error("unable to save profile: {0}")]
    ProfileWriteFailed(String),
    /// Logged only.
    #[error("unable to sign out: {0}")]
    SignOutFailed(String),
}

/// Outcome of a successful sign-up.
#[derive(Debug)]
pub struct Registered {
    pub session: Session,
    /// Where the caller navigates now, without waiting on `profile_write`.
    pub next: Route,
    pub profile_write: Detached,
}

#[derive(Clone)]
pub struct AuthFlow {
    sessions: Arc<dyn SessionProvider>,
    profiles: Arc<dyn ProfileStore>,
    collection: String,
}

impl AuthFlow {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        profiles: Arc<dyn ProfileStore>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            profiles,
            collection: collection.into(),
        }
    }

    /// Gate observing this flow's session provider.
    #[must_use]
    pub fn gate(&self) -> SessionGate {
        SessionGate::new(self.sessions.subscribe())
    }

    /// Asks the provider for the current session. Failures leave the session
    /// resolved to none and are only logged.
    pub async fn restore(&self) {
        if let Err(err) = self.sessions.refresh().await {
            error!("session refresh failed: {err}");
        }
    }

    /// Creates the account, then writes the profile in the background.
    ///
    /// # Errors
    /// Returns `RegistrationFailed` with the provider's message when the
    /// account cannot be created.
    #[instrument(skip_all)]
    pub async fn register(&self, registration: Registration) -> Result<Registered, AuthError> {
        let Registration {
            credentials,
            profile,
        } = registration;

        let session = self
            .sessions
            .create_account(&credentials.email, &credentials.password)
            .await
            .map_err(|err| {
                debug!("account creation refused: {err}");
                AuthError::RegistrationFailed(err.to_string())
            })?;

        debug!(uid = %session.uid, "account created");

        let profile = Profile::new(profile, session.email.clone(), Utc::now());
        let profiles = Arc::clone(&self.profiles);
        let collection = self.collection.clone();
        let key = session.uid.clone();
        // Bound to the new account now; a later sign-out must not change it.
        let token = self.sessions.id_token();

        // Not awaited: the profile may land after the dashboard renders, or never.
        let profile_write = detached::spawn("profile.write", async move {
            profiles
                .write(&collection, &key, &profile, token.as_ref())
                .await
                .map_err(|err| AuthError::ProfileWriteFailed(err.to_string()))
        });

        Ok(Registered {
            session,
            next: Route::Dashboard,
            profile_write,
        })
    }

    /// # Errors
    /// Returns `SignInFailed` with the provider's message.
    #[instrument(skip_all)]
    pub async fn sign_in(&self, credentials: Credentials) -> Result<Route, AuthError> {
        let session = self
            .sessions
            .sign_in(&credentials.email, &credentials.password)
            .await
            .map_err(|err| AuthError::SignInFailed(err.to_string()))?;

        debug!(uid = %session.uid, "signed in");

        Ok(Route::Dashboard)
    }

    /// Signs out. Always returns the sign-in route, even on failure.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Route {
        if let Err(err) = self.sessions.sign_out().await {
            let err = AuthError::SignOutFailed(err.to_string());
            error!("{err}");
        }

        Route::SignIn
    }
}
