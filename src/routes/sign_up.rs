//! Sign-up route. Prompts every field in order, shows an error as soon as a
//! field is entered, and re-prompts only the failing fields until the form
//! validates. A provider failure is shown next to the submit step and the
//! credential fields are asked again.
//!
//! Flow Overview: Validate, create the account, navigate to the dashboard.
//! The profile record is written in the background and never awaited here.

use crate::auth::{Field, Form, FormValues, SignUpValues};
use crate::routes::{BACK, Context, Next, Route, Terminal, already_signed_in};
use std::io;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::debug;

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

    terminal.say("Create account").await?;
    let mut form: Form<SignUpValues> = Form::new();

    loop {
        for &field in SignUpValues::FIELDS {
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

        let Ok(registration) = form.submit() else {
            continue;
        };

        match context.flow.register(registration).await {
            Ok(registered) => {
                debug!(task = registered.profile_write.name(), "profile write detached");
                return Ok(Next::Go(registered.next));
            }
            Err(err) => {
                terminal.say(&err.to_string()).await?;
                for field in [Field::Email, Field::Password, Field::ConfirmPassword] {
                    form.reset(field);
                }
            }
        }
    }
}
