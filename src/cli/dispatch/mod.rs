//! Maps validated CLI arguments to the action the binary runs.

use crate::api::base_url;
use crate::cli::actions::{Action, shell::Args};
use crate::cli::commands::provider;
use anyhow::{Context, Result};

/// Map validated CLI matches to the shell action.
///
/// # Errors
/// Returns an error if required arguments are missing or a service URL is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let options = provider::Options::parse(matches)?;

    base_url(&options.identity_url).context("invalid AUTHGATE_IDENTITY_URL")?;
    base_url(&options.document_url).context("invalid AUTHGATE_DOCUMENT_URL")?;

    Ok(Action::Shell(Args {
        identity_url: options.identity_url,
        api_key: options.api_key,
        document_url: options.document_url,
        project_id: options.project_id,
        profile_collection: options.profile_collection,
        timeout_seconds: options.timeout_seconds,
    }))
}
