use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use drill_core::model::ChatId;

use crate::drill::Reply;
use crate::error::TransportError;

/// Entry of the command menu a transport advertises to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotCommand {
    pub command: &'static str,
    pub description: &'static str,
}

/// Commands published at startup.
pub const BOT_COMMANDS: [BotCommand; 3] = [
    BotCommand {
        command: "start",
        description: "Показать приветствие и команды",
    },
    BotCommand {
        command: "quiz",
        description: "Начать или продолжить вопросы",
    },
    BotCommand {
        command: "stop",
        description: "Остановить текущую сессию",
    },
];

/// A message received from a chat. Non-text updates carry `text: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    pub text: Option<String>,
}

impl IncomingMessage {
    #[must_use]
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: Some(text.into()),
        }
    }
}

/// Outbound side of a chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Publish the command menu.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the platform rejects the request.
    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), TransportError>;

    /// Deliver one reply to a chat.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the reply cannot be delivered.
    async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), TransportError>;
}

/// Transport that keeps every outgoing reply in memory, for tests and prototyping.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<(ChatId, Reply)>>>,
    commands: Arc<Mutex<Vec<BotCommand>>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reply sent so far, in delivery order.
    #[must_use]
    pub fn sent(&self) -> Vec<(ChatId, Reply)> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Replies delivered to one chat, in order.
    #[must_use]
    pub fn sent_to(&self, chat: ChatId) -> Vec<Reply> {
        self.sent()
            .into_iter()
            .filter(|(to, _)| *to == chat)
            .map(|(_, reply)| reply)
            .collect()
    }

    /// Drain and return everything sent so far.
    pub fn take(&self) -> Vec<(ChatId, Reply)> {
        self.sent
            .lock()
            .map(|mut sent| std::mem::take(&mut *sent))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn commands(&self) -> Vec<BotCommand> {
        self.commands
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), TransportError> {
        let mut guard = self
            .commands
            .lock()
            .map_err(|e| TransportError::Send(e.to_string()))?;
        *guard = commands.to_vec();
        Ok(())
    }

    async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), TransportError> {
        let mut guard = self
            .sent
            .lock()
            .map_err(|e| TransportError::Send(e.to_string()))?;
        guard.push((chat, reply.clone()));
        Ok(())
    }
}
