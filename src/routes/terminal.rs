use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

/// Line-oriented input and output for the screens.
pub struct Terminal<R, W> {
    lines: Lines<R>,
    output: W,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            lines: input.lines(),
            output,
        }
    }

    /// Writes one line and flushes.
    ///
    /// # Errors
    /// Returns an error if the output cannot be written.
    pub async fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    /// Prints `prompt` and reads the answer without its line ending.
    /// `None` when input is exhausted.
    ///
    /// # Errors
    /// Returns an error if the prompt cannot be written or input cannot be read.
    pub async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.write_all(b": ").await?;
        self.output.flush().await?;

        let line = self.lines.next_line().await?;
        Ok(line.map(|line| line.trim_end_matches('\r').to_string()))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
