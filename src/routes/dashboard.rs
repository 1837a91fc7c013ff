//! Protected landing page after sign-in. Guarded by the session gate: shows a
//! loading line until the session resolves and redirects when there is none.

use crate::auth::GateView;
use crate::routes::{Context, Next, QUIT, Terminal};
use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};

pub(super) async fn render<R, W>(
    terminal: &mut Terminal<R, W>,
    context: &mut Context,
) -> io::Result<Next>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if context.gate.view() == GateView::Loading {
        terminal.say("Loading...").await?;
    }

    let email = match context.gate.settle().await.view() {
        GateView::Protected { email } => email,
        GateView::Redirect(route) => return Ok(Next::Go(route)),
        // settle only returns resolved states
        GateView::Loading => return Ok(Next::Quit),
    };

    terminal.say("Welcome").await?;
    terminal.say(&email).await?;

    loop {
        let Some(command) = terminal.ask("logout | quit").await? else {
            return Ok(Next::Quit);
        };

        match command.trim() {
            "logout" => {
                let route = context.gate.logout(&context.flow).await;
                terminal.say("You are logged out.").await?;
                return Ok(Next::Go(route));
            }
            QUIT => return Ok(Next::Quit),
            _ => terminal.say("Unknown option.").await?,
        }
    }
}
