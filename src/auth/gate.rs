//! Session gate for protected screens. It reads the session channel and
//! decides between a loading indicator, a redirect, or the protected content.
//! UX-only guard; real access control lives with the identity service.

use crate::auth::{
    flow::AuthFlow,
    types::{Session, SessionState},
};
use crate::routes::Route;
use tokio::sync::watch;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Unauthenticated,
    Authenticated(Session),
}

impl From<&SessionState> for GateState {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Loading => Self::Loading,
            SessionState::Resolved(None) => Self::Unauthenticated,
            SessionState::Resolved(Some(session)) => Self::Authenticated(session.clone()),
        }
    }
}

/// What a protected screen should do for the current state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateView {
    Loading,
    Redirect(Route),
    Protected { email: String },
}

impl GateState {
    #[must_use]
    pub fn view(&self) -> GateView {
        match self {
            Self::Loading => GateView::Loading,
            Self::Unauthenticated => GateView::Redirect(Route::SignIn),
            Self::Authenticated(session) => GateView::Protected {
                email: session.email.clone(),
            },
        }
    }
}

/// Read-only observer of the session.
#[derive(Clone, Debug)]
pub struct SessionGate {
    sessions: watch::Receiver<SessionState>,
}

impl SessionGate {
    #[must_use]
    pub const fn new(sessions: watch::Receiver<SessionState>) -> Self {
        Self { sessions }
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        GateState::from(&*self.sessions.borrow())
    }

    #[must_use]
    pub fn view(&self) -> GateView {
        self.state().view()
    }

    /// Waits until the provider has answered at least once. A closed channel
    /// counts as signed out.
    pub async fn settle(&mut self) -> GateState {
        match self.sessions.wait_for(|state| !state.is_loading()).await {
            Ok(state) => GateState::from(&*state),
            Err(_) => GateState::Unauthenticated,
        }
    }

    /// Waits for the next session change. `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<GateState> {
        self.sessions.changed().await.ok()?;
        Some(self.state())
    }

    /// Logout action exposed to protected content. Navigates to sign-in
    /// whatever the sign-out outcome.
    pub async fn logout(&self, flow: &AuthFlow) -> Route {
        flow.logout().await
    }
}
