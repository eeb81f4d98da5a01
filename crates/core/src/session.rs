use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::model::Question;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Drill progress for a single chat.
///
/// Questions wait in a FIFO `pending` queue. `try_get_next_question` promotes the
/// head into the `current` slot, where it stays until the user marks it known
/// (retired) or unknown (requeued at the tail). At most one question is ever in
/// flight.
///
/// The session does no locking of its own; callers serialize access per chat.
pub struct DrillSession {
    pending: VecDeque<Arc<Question>>,
    current: Option<Arc<Question>>,
    active: bool,
}

impl DrillSession {
    /// Create an active session whose queue holds `questions` in order.
    #[must_use]
    pub fn new(questions: impl IntoIterator<Item = Arc<Question>>) -> Self {
        let mut session = Self {
            pending: VecDeque::new(),
            current: None,
            active: false,
        };
        session.reset(questions);
        session
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True while anything is left to ask, either queued or in flight.
    #[must_use]
    pub fn has_questions(&self) -> bool {
        !self.pending.is_empty() || self.current.is_some()
    }

    /// The question awaiting an answer, without promoting a new one.
    #[must_use]
    pub fn current(&self) -> Option<&Arc<Question>> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Pause the drill. The in-flight question is dropped, not requeued.
    pub fn stop(&mut self) {
        self.active = false;
        self.current = None;
    }

    /// Replace the queue with `questions` and start over in the active state.
    pub fn reset(&mut self, questions: impl IntoIterator<Item = Arc<Question>>) {
        self.pending.clear();
        self.pending.extend(questions);
        self.current = None;
        self.active = true;
    }

    /// Return the in-flight question, or promote the head of the queue.
    ///
    /// Repeated calls without marking the question return the same item.
    /// Returns `None` once both the queue and the current slot are empty.
    pub fn try_get_next_question(&mut self) -> Option<Arc<Question>> {
        if let Some(current) = &self.current {
            return Some(Arc::clone(current));
        }

        let Some(next) = self.pending.pop_front() else {
            self.current = None;
            return None;
        };

        self.current = Some(Arc::clone(&next));
        Some(next)
    }

    /// Retire the current question. Returns `false` if none is in flight.
    pub fn try_mark_known(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Send the current question to the back of the queue.
    /// Returns `false` if none is in flight.
    pub fn try_mark_unknown(&mut self) -> bool {
        match self.current.take() {
            Some(question) => {
                self.pending.push_back(question);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for DrillSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrillSession")
            .field("pending_len", &self.pending.len())
            .field("current", &self.current.as_ref().map(|q| q.id()))
            .field("active", &self.active)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
