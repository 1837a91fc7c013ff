use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;

/// Signed-in identity as reported by the session provider.
/// Holds no token material; tokens stay inside the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub uid: String,
    pub email: String,
}

/// Observable session value. `Loading` until the provider has answered once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Loading,
    Resolved(Option<Session>),
}

impl SessionState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Resolved(Some(session)) => Some(session),
            _ => None,
        }
    }
}

/// Email and password that passed validation.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub(crate) email: String,
    pub(crate) password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }
}

/// User-supplied profile metadata collected on the sign-up form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileFields {
    pub full_name: String,
    pub user_name: Option<String>,
    pub phone: String,
}

/// A sign-up submission. Only obtainable from a form that validated cleanly,
/// so holding one means every field rule passed.
#[derive(Clone, Debug)]
pub struct Registration {
    pub(crate) credentials: Credentials,
    pub(crate) profile: ProfileFields,
}

impl Registration {
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub const fn profile(&self) -> &ProfileFields {
        &self.profile
    }
}

/// Profile record stored under the identity id. Written once, never read back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub user_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    #[must_use]
    pub fn new(fields: ProfileFields, email: String, created_at: DateTime<Utc>) -> Self {
        Self {
            full_name: fields.full_name,
            user_name: fields.user_name,
            email,
            phone: fields.phone,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_state_defaults_to_loading() {
        let state = SessionState::default();
        assert!(state.is_loading());
        assert_eq!(state.session(), None);
    }

    #[test]
    fn resolved_state_exposes_session() {
        let session = Session {
            uid: "uid-1".to_string(),
            email: "a@b.com".to_string(),
        };
        let state = SessionState::Resolved(Some(session.clone()));
        assert!(!state.is_loading());
        assert_eq!(state.session(), Some(&session));
        assert_eq!(SessionState::Resolved(None).session(), None);
    }

    #[test]
    fn profile_serializes_camel_case() -> Result<(), serde_json::Error> {
        let created_at = DateTime::from_timestamp(0, 0).unwrap_or_default();
        let profile = Profile::new(
            ProfileFields {
                full_name: "Jane Doe".to_string(),
                user_name: None,
                phone: "5551234567".to_string(),
            },
            "jane@example.com".to_string(),
            created_at,
        );
        let value = serde_json::to_value(&profile)?;
        assert_eq!(value["fullName"], "Jane Doe");
        assert!(value["userName"].is_null());
        assert_eq!(value["createdAt"], "1970-01-01T00:00:00Z");
        Ok(())
    }
}
