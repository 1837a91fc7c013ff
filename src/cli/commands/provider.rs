use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_IDENTITY_URL: &str = "identity-url";
pub const ARG_API_KEY: &str = "api-key";
pub const ARG_DOCUMENT_URL: &str = "document-url";
pub const ARG_PROJECT_ID: &str = "project-id";
pub const ARG_PROFILE_COLLECTION: &str = "profile-collection";
pub const ARG_TIMEOUT_SECONDS: &str = "timeout-seconds";

#[derive(Debug)]
pub struct Options {
    pub identity_url: String,
    pub api_key: SecretString,
    pub document_url: String,
    pub project_id: String,
    pub profile_collection: String,
    pub timeout_seconds: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let string = |id: &str| -> Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .with_context(|| format!("missing required argument: --{id}"))
        };

        Ok(Self {
            identity_url: string(ARG_IDENTITY_URL)?,
            api_key: SecretString::from(string(ARG_API_KEY)?),
            document_url: string(ARG_DOCUMENT_URL)?,
            project_id: string(ARG_PROJECT_ID)?,
            profile_collection: string(ARG_PROFILE_COLLECTION)?,
            timeout_seconds: matches
                .get_one::<u64>(ARG_TIMEOUT_SECONDS)
                .copied()
                .unwrap_or(10),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_IDENTITY_URL)
                .long(ARG_IDENTITY_URL)
                .help("Identity service base URL")
                .env("AUTHGATE_IDENTITY_URL")
                .default_value("https://identitytoolkit.googleapis.com"),
        )
        .arg(
            Arg::new(ARG_API_KEY)
                .long(ARG_API_KEY)
                .help("Identity service API key")
                .env("AUTHGATE_API_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_DOCUMENT_URL)
                .long(ARG_DOCUMENT_URL)
                .help("Document store base URL for profile records")
                .env("AUTHGATE_DOCUMENT_URL")
                .default_value("https://firestore.googleapis.com"),
        )
        .arg(
            Arg::new(ARG_PROJECT_ID)
                .long(ARG_PROJECT_ID)
                .help("Project that owns the document store")
                .env("AUTHGATE_PROJECT_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROFILE_COLLECTION)
                .long(ARG_PROFILE_COLLECTION)
                .help("Collection where profile records are written")
                .env("AUTHGATE_PROFILE_COLLECTION")
                .default_value("users"),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_SECONDS)
                .long(ARG_TIMEOUT_SECONDS)
                .help("HTTP request timeout in seconds")
                .env("AUTHGATE_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
