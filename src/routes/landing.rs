//! Landing page: the entry point offering sign-in or sign-up.

use crate::routes::{Next, QUIT, Route, Terminal};
use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};

pub(super) async fn render<R, W>(terminal: &mut Terminal<R, W>) -> io::Result<Next>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    terminal.say("Welcome to our app").await?;

    loop {
        let Some(choice) = terminal.ask("sign-in | sign-up | quit").await? else {
            return Ok(Next::Quit);
        };

        match choice.trim() {
            "sign-in" | "1" => return Ok(Next::Go(Route::SignIn)),
            "sign-up" | "2" => return Ok(Next::Go(Route::SignUp)),
            QUIT => return Ok(Next::Quit),
            other => {
                if let Some(route) = Route::from_path(other) {
                    return Ok(Next::Go(route));
                }
                terminal.say("Unknown option.").await?;
            }
        }
    }
}
