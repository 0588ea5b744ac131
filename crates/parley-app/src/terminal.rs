//! Terminal chat: a [`ChatTransport`] that prints to a writer, and the
//! read-eval loop that feeds stdin lines to a handler.

use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use parley_chat::{ChatHandler, ChatTransport, MessageId, TransportError};
use parley_common::SessionId;
use parley_config::StarterConfig;

struct Screen<W> {
    out: W,
    /// The message on the current line and what it shows so far.
    open: Option<(MessageId, String)>,
}

impl<W: Write> Screen<W> {
    fn close_line(&mut self) -> std::io::Result<()> {
        if self.open.take().is_some() {
            writeln!(self.out)?;
        }
        Ok(())
    }
}

/// Prints messages as lines. Tokens extend the open line; an update that
/// differs from what is shown is printed again in full.
pub struct TerminalTransport<W> {
    screen: Mutex<Screen<W>>,
}

impl TerminalTransport<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalTransport<W> {
    pub fn new(out: W) -> Self {
        Self {
            screen: Mutex::new(Screen { out, open: None }),
        }
    }

    fn screen(&self) -> MutexGuard<'_, Screen<W>> {
        self.screen.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// End the open line, e.g. before prompting for input.
    pub fn finish_line(&self) -> Result<(), TransportError> {
        let mut screen = self.screen();
        screen.close_line()?;
        screen.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.screen
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
            .out
    }
}

#[async_trait]
impl<W: Write + Send> ChatTransport for TerminalTransport<W> {
    async fn send_message(&self, content: &str) -> Result<MessageId, TransportError> {
        let id = MessageId::new();
        let mut screen = self.screen();
        screen.close_line()?;
        write!(screen.out, "{content}")?;
        screen.out.flush()?;
        screen.open = Some((id.clone(), content.to_string()));
        Ok(id)
    }

    async fn update_message(&self, id: &MessageId, content: &str) -> Result<(), TransportError> {
        let mut screen = self.screen();
        let shown = match &screen.open {
            Some((open, shown)) if open == id => Some(shown.clone()),
            _ => None,
        };
        match shown {
            Some(shown) if shown == content => {}
            Some(shown) if !shown.is_empty() && content.starts_with(&shown) => {
                write!(screen.out, "{}", &content[shown.len()..])?;
            }
            Some(shown) if shown.is_empty() => write!(screen.out, "{content}")?,
            _ => {
                screen.close_line()?;
                write!(screen.out, "{content}")?;
            }
        }
        screen.open = None;
        writeln!(screen.out)?;
        screen.out.flush()?;
        Ok(())
    }

    async fn stream_token(&self, id: &MessageId, token: &str) -> Result<(), TransportError> {
        let mut screen = self.screen();
        let is_open = matches!(&screen.open, Some((open, _)) if open == id);
        if !is_open {
            screen.close_line()?;
            screen.open = Some((id.clone(), String::new()));
        }
        write!(screen.out, "{token}")?;
        screen.out.flush()?;
        if let Some((_, shown)) = screen.open.as_mut() {
            shown.push_str(token);
        }
        Ok(())
    }

    async fn send_starters(&self, starters: &[StarterConfig]) -> Result<(), TransportError> {
        let mut screen = self.screen();
        screen.close_line()?;
        writeln!(screen.out, "Try one of:")?;
        for starter in starters {
            writeln!(screen.out, "  [{}] {}", starter.label, starter.message)?;
        }
        screen.out.flush()?;
        Ok(())
    }
}

/// Run an interactive chat on stdin/stdout until EOF or `/quit`.
pub async fn run_chat<H: ChatHandler>(handler: &H) -> Result<(), TransportError> {
    let transport = TerminalTransport::stdout();
    let mut session = handler.on_chat_start(SessionId::new(), &transport).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        transport.finish_line()?;
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let text = line.trim();
        match text {
            "" => continue,
            "/quit" | "/exit" => break,
            _ => handler.on_message(&mut session, &transport, text).await?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(transport: TerminalTransport<Vec<u8>>) -> String {
        String::from_utf8(transport.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn streamed_message_is_not_reprinted() {
        let transport = TerminalTransport::new(Vec::new());
        let id = transport.send_message("").await.unwrap();
        transport.stream_token(&id, "Hel").await.unwrap();
        transport.stream_token(&id, "lo").await.unwrap();
        transport.update_message(&id, "Hello").await.unwrap();
        assert_eq!(output(transport), "Hello\n");
    }

    #[tokio::test]
    async fn placeholder_is_replaced_on_a_new_line() {
        let transport = TerminalTransport::new(Vec::new());
        let id = transport.send_message("Thinking...").await.unwrap();
        transport.update_message(&id, "All good.").await.unwrap();
        assert_eq!(output(transport), "Thinking...\nAll good.\n");
    }

    #[tokio::test]
    async fn greeting_then_starters() {
        let transport = TerminalTransport::new(Vec::new());
        transport
            .send_message("Hello! How can I assist you today?")
            .await
            .unwrap();
        transport
            .send_starters(&[StarterConfig {
                label: "Weather".into(),
                message: "Find the weather in Hyderabad.".into(),
            }])
            .await
            .unwrap();
        assert_eq!(
            output(transport),
            "Hello! How can I assist you today?\nTry one of:\n  [Weather] Find the weather in Hyderabad.\n"
        );
    }

    #[tokio::test]
    async fn partial_stream_is_completed_by_update() {
        let transport = TerminalTransport::new(Vec::new());
        let id = transport.send_message("").await.unwrap();
        transport.stream_token(&id, "The answer").await.unwrap();
        transport.update_message(&id, "The answer is 42.").await.unwrap();
        assert_eq!(output(transport), "The answer is 42.\n");
    }
}
