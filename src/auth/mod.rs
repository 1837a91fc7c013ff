//! Auth feature module covering credential validation, form state, the
//! sign-up/sign-in/logout flows, and the session gate for protected screens.
//! It keeps authentication logic out of the screens and must never log
//! passwords or token material.
//!
//! Flow Overview: Sign-up validates the form, creates the account, navigates
//! to the dashboard and writes the profile in a detached task. Sign-in
//! validates and establishes a session. Logout always ends on `/sign-in`.

pub mod detached;
pub mod flow;
pub mod form;
pub mod gate;
pub mod provider;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use flow::{AuthError, AuthFlow, Registered};
pub use form::Form;
pub use gate::{GateState, GateView, SessionGate};
pub use provider::{ProfileStore, ProviderError, SessionProvider, SessionStore};
pub use types::{Credentials, Profile, ProfileFields, Registration, Session, SessionState};
pub use validation::{Field, FieldErrors, FormValues, SignInValues, SignUpValues};
