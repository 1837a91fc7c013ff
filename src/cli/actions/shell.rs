use crate::{
    api::{DocumentClient, IdentityClient},
    auth::AuthFlow,
    cli::telemetry,
    routes::{Shell, Terminal},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tokio::io::{BufReader, stdin, stdout};
use tracing::debug;

pub struct Args {
    pub identity_url: String,
    pub api_key: SecretString,
    pub document_url: String,
    pub project_id: String,
    pub profile_collection: String,
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("identity_url", &self.identity_url)
            .field("api_key", &"***")
            .field("document_url", &self.document_url)
            .field("project_id", &self.project_id)
            .field("profile_collection", &self.profile_collection)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Builds the providers and runs the terminal front-end on stdin/stdout.
/// # Errors
/// Returns an error if a client cannot be configured or the terminal fails.
pub async fn execute(args: Args) -> Result<()> {
    debug!("starting shell: {:?}", args);

    let timeout = Duration::from_secs(args.timeout_seconds);

    let identity = Arc::new(
        IdentityClient::new(&args.identity_url, args.api_key, timeout)
            .context("Failed to configure identity client")?,
    );
    let documents = DocumentClient::new(&args.document_url, &args.project_id, timeout)
        .context("Failed to configure document client")?;

    let flow = AuthFlow::new(identity, Arc::new(documents), args.profile_collection);

    let terminal = Terminal::new(BufReader::new(stdin()), stdout());
    let result = Shell::new(terminal, flow).run().await;

    telemetry::shutdown_tracer();

    result.context("Terminal session failed")?;

    Ok(())
}
