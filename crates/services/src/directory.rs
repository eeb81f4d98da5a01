use std::sync::Arc;

use dashmap::DashMap;
use drill_core::model::{ChatId, Question};
use drill_core::session::DrillSession;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Shared handle to one chat's session.
///
/// The mutex is the per-chat serialization point: hold it for the whole
/// lookup, operate, reply sequence.
pub type SessionHandle = Arc<Mutex<DrillSession>>;

/// Exclusive access to a chat's session, detached from the directory.
pub type SessionGuard = OwnedMutexGuard<DrillSession>;

/// Maps chat identities to their sessions.
///
/// Slots are created lazily and never removed. Map operations are atomic per
/// slot; session state is only reachable through the per-chat mutex.
#[derive(Debug, Default)]
pub struct SessionDirectory {
    sessions: DashMap<ChatId, SessionHandle>,
}

impl SessionDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session without creating one.
    #[must_use]
    pub fn get(&self, chat: ChatId) -> Option<SessionHandle> {
        self.sessions.get(&chat).map(|entry| Arc::clone(entry.value()))
    }

    /// Return the chat's session, installing one built by `factory` if absent.
    ///
    /// `factory` runs at most once, and only when the slot is empty.
    pub fn get_or_create<F>(&self, chat: ChatId, factory: F) -> SessionHandle
    where
        F: FnOnce() -> DrillSession,
    {
        let mut created = false;
        let handle = {
            let entry = self.sessions.entry(chat).or_insert_with(|| {
                created = true;
                Arc::new(Mutex::new(factory()))
            });
            Arc::clone(entry.value())
        };
        if created {
            debug!(chat = %chat, sessions = self.len(), "created session");
        }
        handle
    }

    /// Start the chat over from `questions`, leaving the session stopped.
    ///
    /// A missing slot gets a new session built from `questions`; an existing
    /// one is reset in place, so every holder of its handle sees the change.
    /// The returned guard keeps the session locked until dropped. A new session
    /// is locked before it is published, so no other caller can observe it
    /// before this guard is released.
    pub async fn create_or_reset<I>(&self, chat: ChatId, questions: I) -> SessionGuard
    where
        I: IntoIterator<Item = Arc<Question>>,
    {
        let mut questions = Some(questions);
        let mut created: Option<SessionGuard> = None;
        let handle = {
            let entry = self.sessions.entry(chat).or_insert_with(|| {
                let mut session = DrillSession::new(questions.take().into_iter().flatten());
                session.stop();
                let handle = Arc::new(Mutex::new(session));
                created = Arc::clone(&handle).try_lock_owned().ok();
                handle
            });
            Arc::clone(entry.value())
        };

        if let Some(session) = created {
            debug!(chat = %chat, sessions = self.len(), "created stopped session");
            return session;
        }

        let mut session = handle.lock_owned().await;
        if let Some(questions) = questions {
            debug!(chat = %chat, "resetting existing session");
            session.reset(questions);
            session.stop();
        }
        session
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
