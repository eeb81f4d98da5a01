use std::sync::Arc;

use drill_core::model::{ChatId, QuestionBank};
use drill_core::session::DrillSession;
use storage::QuestionSource;
use tracing::{debug, info};

use crate::directory::SessionDirectory;
use crate::error::{BootstrapError, DispatchError};
use crate::transport::{BOT_COMMANDS, ChatTransport, IncomingMessage};

use super::command::DrillCommand;
use super::reply::Reply;

/// Turns chat messages into session operations and replies.
///
/// Cheap to clone; clones share the bank and the session directory, so one
/// service can be handed to many concurrent update handlers.
#[derive(Debug, Clone)]
pub struct DrillService {
    bank: QuestionBank,
    directory: Arc<SessionDirectory>,
}

impl DrillService {
    #[must_use]
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            directory: Arc::new(SessionDirectory::new()),
        }
    }

    /// Load the bank from `source` and build the service.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::Storage` if the bank cannot be loaded.
    pub async fn from_source(source: &dyn QuestionSource) -> Result<Self, BootstrapError> {
        let bank = source.load().await?;
        info!(questions = bank.len(), "question bank loaded");
        Ok(Self::new(bank))
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn directory(&self) -> &SessionDirectory {
        &self.directory
    }

    /// Advertise the command menu on `transport`.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::Transport` if the transport rejects it.
    pub async fn publish_commands(
        &self,
        transport: &dyn ChatTransport,
    ) -> Result<(), BootstrapError> {
        transport.set_commands(&BOT_COMMANDS).await?;
        Ok(())
    }

    /// Handle one incoming message, sending every reply before returning.
    ///
    /// The chat's session stays locked from lookup until the last reply is
    /// delivered, so messages from the same chat never interleave.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Transport` if a reply cannot be delivered.
    pub async fn handle(
        &self,
        transport: &dyn ChatTransport,
        message: &IncomingMessage,
    ) -> Result<(), DispatchError> {
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };
        let chat = message.chat_id;
        let command = DrillCommand::parse(text);
        debug!(chat = %chat, ?command, "dispatching message");

        match command {
            DrillCommand::Start => self.start(transport, chat).await,
            DrillCommand::Quiz => self.quiz(transport, chat).await,
            DrillCommand::Stop => self.stop(transport, chat).await,
            DrillCommand::Known | DrillCommand::Unknown | DrillCommand::Fallback => {
                self.answer(transport, chat, command).await
            }
        }
    }

    async fn start(&self, transport: &dyn ChatTransport, chat: ChatId) -> Result<(), DispatchError> {
        let _session = self.directory.create_or_reset(chat, self.bank.iter()).await;
        info!(chat = %chat, "session prepared");
        transport.send(chat, &Reply::greeting()).await?;
        Ok(())
    }

    async fn quiz(&self, transport: &dyn ChatTransport, chat: ChatId) -> Result<(), DispatchError> {
        let handle = self
            .directory
            .get_or_create(chat, || DrillSession::new(self.bank.iter()));
        let mut session = handle.lock().await;

        if !session.has_questions() {
            debug!(chat = %chat, "pool exhausted, refilling from bank");
            session.reset(self.bank.iter());
        }
        session.activate();

        transport.send(chat, &Reply::lets_go()).await?;
        send_next_question(transport, chat, &mut session).await
    }

    async fn stop(&self, transport: &dyn ChatTransport, chat: ChatId) -> Result<(), DispatchError> {
        let Some(handle) = self.directory.get(chat) else {
            transport.send(chat, &Reply::not_started()).await?;
            return Ok(());
        };

        let mut session = handle.lock().await;
        session.stop();
        info!(chat = %chat, pending = session.pending_len(), "session stopped");
        transport.send(chat, &Reply::stopped()).await?;
        Ok(())
    }

    async fn answer(
        &self,
        transport: &dyn ChatTransport,
        chat: ChatId,
        command: DrillCommand,
    ) -> Result<(), DispatchError> {
        let Some(handle) = self.directory.get(chat) else {
            transport.send(chat, &Reply::quiz_prompt()).await?;
            return Ok(());
        };
        let mut session = handle.lock().await;
        if !session.is_active() {
            transport.send(chat, &Reply::quiz_prompt()).await?;
            return Ok(());
        }

        match command {
            DrillCommand::Known => {
                if session.try_mark_known() {
                    transport.send(chat, &Reply::known_ack()).await?;
                    send_next_question(transport, chat, &mut session).await?;
                } else {
                    transport.send(chat, &Reply::no_question_for_known()).await?;
                }
            }
            DrillCommand::Unknown => {
                if session.try_mark_unknown() {
                    transport.send(chat, &Reply::unknown_ack()).await?;
                    send_next_question(transport, chat, &mut session).await?;
                } else {
                    transport
                        .send(chat, &Reply::no_question_for_unknown())
                        .await?;
                }
            }
            _ => transport.send(chat, &Reply::help()).await?,
        }
        Ok(())
    }
}

/// Ask the next question, or stop the session and congratulate when none remain.
async fn send_next_question(
    transport: &dyn ChatTransport,
    chat: ChatId,
    session: &mut DrillSession,
) -> Result<(), DispatchError> {
    let Some(question) = session.try_get_next_question() else {
        session.stop();
        info!(chat = %chat, "question pool completed");
        transport.send(chat, &Reply::completed()).await?;
        return Ok(());
    };

    debug!(chat = %chat, question = %question.id(), pending = session.pending_len(), "asking question");
    transport.send(chat, &Reply::question(&question)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill::Keyboard;
    use crate::transport::RecordingTransport;
    use drill_core::model::Question;

    fn service(ids: &[&str]) -> DrillService {
        let questions = ids
            .iter()
            .map(|id| Question::new(*id, format!("Вопрос {id}")).unwrap())
            .collect();
        DrillService::new(QuestionBank::new(questions).unwrap())
    }

    async fn say(service: &DrillService, transport: &RecordingTransport, chat: ChatId, text: &str) {
        service
            .handle(transport, &IncomingMessage::text(chat, text))
            .await
            .unwrap();
    }

    fn texts(transport: &RecordingTransport) -> Vec<String> {
        transport.take().into_iter().map(|(_, r)| r.text).collect()
    }

    #[tokio::test]
    async fn start_prepares_stopped_session() {
        let service = service(&["q1"]);
        let transport = RecordingTransport::new();
        let chat = ChatId::new(1);

        say(&service, &transport, chat, "/start").await;

        let sent = transport.take();
        assert_eq!(sent, vec![(chat, Reply::greeting())]);
        let handle = service.directory().get(chat).unwrap();
        let session = handle.lock().await;
        assert!(!session.is_active());
        assert!(session.has_questions());
    }

    #[tokio::test]
    async fn quiz_sends_first_question_with_answer_keyboard() {
        let service = service(&["q1", "q2"]);
        let transport = RecordingTransport::new();
        let chat = ChatId::new(1);

        say(&service, &transport, chat, "/quiz").await;

        let sent = transport.sent_to(chat);
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], Reply::lets_go());
        assert_eq!(sent[1].text, "Вопрос q1");
        assert_eq!(sent[1].keyboard, Keyboard::Answer);
    }

    #[tokio::test]
    async fn answers_before_quiz_prompt_for_quiz() {
        let service = service(&["q1"]);
        let transport = RecordingTransport::new();
        let chat = ChatId::new(5);

        say(&service, &transport, chat, "Знаю").await;
        say(&service, &transport, chat, "/start").await;
        say(&service, &transport, chat, "Не знаю").await;

        let sent = transport.sent_to(chat);
        assert_eq!(sent[0], Reply::quiz_prompt());
        assert_eq!(sent[1], Reply::greeting());
        assert_eq!(sent[2], Reply::quiz_prompt());
    }

    #[tokio::test]
    async fn stop_without_session_reports_not_started() {
        let service = service(&["q1"]);
        let transport = RecordingTransport::new();
        let chat = ChatId::new(2);

        say(&service, &transport, chat, "стоп").await;

        assert_eq!(transport.sent_to(chat), vec![Reply::not_started()]);
        assert!(service.directory().get(chat).is_none());
    }

    #[tokio::test]
    async fn fallback_while_active_shows_help() {
        let service = service(&["q1"]);
        let transport = RecordingTransport::new();
        let chat = ChatId::new(3);

        say(&service, &transport, chat, "/quiz").await;
        transport.take();
        say(&service, &transport, chat, "what?").await;

        assert_eq!(transport.sent_to(chat), vec![Reply::help()]);
    }

    #[tokio::test]
    async fn non_text_messages_are_ignored() {
        let service = service(&["q1"]);
        let transport = RecordingTransport::new();
        let message = IncomingMessage {
            chat_id: ChatId::new(4),
            text: None,
        };

        service.handle(&transport, &message).await.unwrap();

        assert!(transport.sent().is_empty());
        assert!(service.directory().is_empty());
    }

    #[tokio::test]
    async fn unknown_answer_is_asked_again_at_the_end() {
        let service = service(&["q1", "q2"]);
        let transport = RecordingTransport::new();
        let chat = ChatId::new(6);

        say(&service, &transport, chat, "/quiz").await;
        say(&service, &transport, chat, "не знаю").await;
        say(&service, &transport, chat, "знаю").await;
        say(&service, &transport, chat, "знаю").await;

        assert_eq!(
            texts(&transport),
            [
                "Поехали!".to_owned(),
                "Вопрос q1".to_owned(),
                Reply::unknown_ack().text,
                "Вопрос q2".to_owned(),
                Reply::known_ack().text,
                "Вопрос q1".to_owned(),
                Reply::known_ack().text,
                Reply::completed().text,
            ]
        );

        let handle = service.directory().get(chat).unwrap();
        let session = handle.lock().await;
        assert!(!session.is_active());
        assert!(!session.has_questions());
    }

    #[tokio::test]
    async fn publishes_command_menu() {
        let service = service(&["q1"]);
        let transport = RecordingTransport::new();

        service.publish_commands(&transport).await.unwrap();

        let names: Vec<_> = transport.commands().iter().map(|c| c.command).collect();
        assert_eq!(names, ["start", "quiz", "stop"]);
    }
}
