//! Fire-and-forget tasks. The caller never waits on the outcome; a failure
//! is logged and the result is discarded.

use std::{fmt::Display, future::Future};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info_span};

/// Handle to a spawned task. Dropping it does not cancel the task.
#[derive(Debug)]
pub struct Detached {
    name: &'static str,
    handle: JoinHandle<()>,
}

/// Spawns `task` on the runtime and returns immediately.
pub fn spawn<F, E>(name: &'static str, task: F) -> Detached
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let span = info_span!("detached", task = name);
    let handle = tokio::spawn(
        async move {
            match task.await {
                Ok(()) => debug!("detached task finished"),
                // Intentional: the result is dropped, nothing retries it.
                Err(err) => error!(error = %err, "detached task failed, result discarded"),
            }
        }
        .instrument(span),
    );

    Detached { name, handle }
}

impl Detached {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task to end. Navigation never calls this.
    pub async fn join(self) {
        if let Err(err) = self.handle.await {
            error!(task = self.name, "detached task aborted: {err}");
        }
    }
}
