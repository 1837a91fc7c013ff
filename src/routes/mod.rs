//! Screens of the terminal front-end and the navigation loop that moves
//! between them. Each screen renders, reads input, and returns where to go
//! next; the loop owns the current route.

mod dashboard;
mod landing;
mod sign_in;
mod sign_up;
pub mod terminal;

pub use terminal::Terminal;

use crate::auth::{AuthFlow, GateState, SessionGate};
use std::{fmt, io};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::debug;

pub mod paths {
    pub const LANDING: &str = "/";
    pub const SIGN_IN: &str = "/sign-in";
    pub const SIGN_UP: &str = "/sign-up";
    pub const DASHBOARD: &str = "/dashboard";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    SignIn,
    SignUp,
    Dashboard,
}

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => paths::LANDING,
            Self::SignIn => paths::SIGN_IN,
            Self::SignUp => paths::SIGN_UP,
            Self::Dashboard => paths::DASHBOARD,
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            paths::LANDING => Some(Self::Landing),
            paths::SIGN_IN => Some(Self::SignIn),
            paths::SIGN_UP => Some(Self::SignUp),
            paths::DASHBOARD => Some(Self::Dashboard),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Result of rendering a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    Go(Route),
    Quit,
}

/// Typed on any prompt to leave the current form.
pub(crate) const BACK: &str = "back";
pub(crate) const QUIT: &str = "quit";

/// Dependencies shared by every screen.
pub struct Context {
    pub flow: AuthFlow,
    pub gate: SessionGate,
}

impl Context {
    #[must_use]
    pub fn new(flow: AuthFlow) -> Self {
        let gate = flow.gate();
        Self { flow, gate }
    }
}

pub struct Shell<R, W> {
    terminal: Terminal<R, W>,
    context: Context,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(terminal: Terminal<R, W>, flow: AuthFlow) -> Self {
        Self {
            terminal,
            context: Context::new(flow),
        }
    }

    /// Runs from the landing screen until the user quits or input ends.
    /// Returns the output sink.
    ///
    /// # Errors
    /// Returns an error if reading input or writing output fails.
    pub async fn run(mut self) -> io::Result<W> {
        self.context.flow.restore().await;

        let mut route = Route::Landing;
        loop {
            let next = match route {
                Route::Landing => landing::render(&mut self.terminal).await?,
                Route::SignUp => sign_up::render(&mut self.terminal, &mut self.context).await?,
                Route::SignIn => sign_in::render(&mut self.terminal, &mut self.context).await?,
                Route::Dashboard => {
                    dashboard::render(&mut self.terminal, &mut self.context).await?
                }
            };

            match next {
                Next::Go(to) => {
                    debug!(from = %route, to = %to, "navigate");
                    route = to;
                }
                Next::Quit => break,
            }
        }

        self.terminal.say("Bye.").await?;
        Ok(self.terminal.into_output())
    }
}

/// Shown on the auth screens when a session already exists.
async fn already_signed_in<R, W>(
    terminal: &mut Terminal<R, W>,
    context: &Context,
) -> io::Result<Option<Next>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if let GateState::Authenticated(session) = context.gate.state() {
        terminal
            .say(&format!("Already signed in as {}.", session.email))
            .await?;
        return Ok(Some(Next::Go(Route::Dashboard)));
    }
    Ok(None)
}
