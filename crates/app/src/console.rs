//! Line-oriented transport over stdin/stdout.
//!
//! Each input line is `<chat_id> <text>` or bare `<text>` (sent as the default
//! chat). Replies are printed as `[<chat_id>] <text>`, followed by the answer
//! buttons when the reply shows them.

use async_trait::async_trait;
use drill_core::model::ChatId;
use services::{BotCommand, ChatTransport, IncomingMessage, Reply, TransportError};
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

pub struct ConsoleTransport<W> {
    out: Mutex<W>,
}

impl ConsoleTransport<Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> ConsoleTransport<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W> ConsoleTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write(&self, body: &str) -> Result<(), TransportError> {
        let mut out = self.out.lock().await;
        out.write_all(body.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<W> ChatTransport for ConsoleTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), TransportError> {
        self.write(&render_commands(commands)).await
    }

    async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), TransportError> {
        self.write(&render_reply(chat, reply)).await
    }
}

/// Split an input line into the addressed chat and its text.
///
/// Blank lines yield `None`. A leading integer is taken as the chat id only
/// when text follows it.
#[must_use]
pub fn parse_line(line: &str, default_chat: ChatId) -> Option<IncomingMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some((head, rest)) = line.split_once(char::is_whitespace) {
        let rest = rest.trim();
        if let (Ok(chat), false) = (head.parse::<ChatId>(), rest.is_empty()) {
            return Some(IncomingMessage::text(chat, rest));
        }
    }
    Some(IncomingMessage::text(default_chat, line))
}

fn render_reply(chat: ChatId, reply: &Reply) -> String {
    let mut body = String::new();
    for (i, line) in reply.text.lines().enumerate() {
        if i == 0 {
            body.push_str(&format!("[{chat}] {line}\n"));
        } else {
            body.push_str(&format!("{:width$}{line}\n", "", width = chat.to_string().len() + 3));
        }
    }
    for row in reply.keyboard.buttons() {
        let buttons: Vec<_> = row.iter().map(|label| format!("[{label}]")).collect();
        body.push_str(&format!("    {}\n", buttons.join(" ")));
    }
    body
}

fn render_commands(commands: &[BotCommand]) -> String {
    let mut body = String::from("Commands:\n");
    for command in commands {
        body.push_str(&format!("  /{} - {}\n", command.command, command.description));
    }
    body
}
