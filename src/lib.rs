//! # Authgate (Account Front-End)
//!
//! `authgate` drives the account screens of an app: landing, sign-up, sign-in
//! and a session-gated dashboard. Identity and profile storage live in hosted
//! services reached over REST; this crate only validates input, calls those
//! services, and decides where the user goes next.
//!
//! ## Session Lifecycle
//!
//! 1. **Sign-up:** Form input is validated locally. The identity service creates
//!    the account and the user lands on the dashboard right away. The profile
//!    record is written by a detached task whose failure is only logged.
//! 2. **Gate:** The dashboard observes the session through a `watch` channel.
//!    While the provider is being queried it shows a loading state; with no
//!    session it redirects to `/sign-in`.
//! 3. **Logout:** Sign-out errors are logged and swallowed; navigation to
//!    `/sign-in` always happens.
//!
//! The session has exactly one writer (the provider). Screens and guards only
//! read it.

pub mod api;
pub mod auth;
pub mod cli;
pub mod routes;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
