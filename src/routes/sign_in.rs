//! Sign-in route. Validates email and password locally, then asks the
//! identity service for a session and moves to the dashboard.

use crate::auth::{Field, Form, FormValues, SignInValues};
use crate::routes::{BACK, Context, Next, Route, Terminal, already_signed_in};
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
    if let Some(next) = already_signed_in(terminal, context).await? {
        return Ok(next);
    }

    terminal.say("Sign In").await?;
    let mut form: Form<SignInValues> = Form::new();

    loop {
        for &field in SignInValues::FIELDS {
            if form.is_touched(field) && form.error(field).is_none() {
                continue;
            }
            let Some(value) = terminal.ask(field.label()).await? else {
                return Ok(Next::Quit);
            };
            if value.trim() == BACK {
                return Ok(Next::Go(Route::Landing));
            }
            form.set(field, value);
            if let Some(message) = form.error(field) {
                terminal.say(&format!("  {message}")).await?;
            }
        }

        let Ok(credentials) = form.submit() else {
            continue;
        };

        match context.flow.sign_in(credentials).await {
            Ok(next) => return Ok(Next::Go(next)),
            Err(err) => {
                terminal.say(&err.to_string()).await?;
                form.reset(Field::Password);
            }
        }
    }
}
