use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single drill item: an identifier and the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyId` or `QuestionError::EmptyText` when either
    /// field is blank after trimming.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Result<Self, QuestionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText {
                id: QuestionId::new(id),
            });
        }

        Ok(Self {
            id: QuestionId::new(id),
            text,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id must not be empty")]
    EmptyId,

    #[error("question {id} has empty text")]
    EmptyText { id: QuestionId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_text_verbatim() {
        let q = Question::new("q1", "  What is a coroutine?  ").unwrap();
        assert_eq!(q.id().as_str(), "q1");
        assert_eq!(q.text(), "  What is a coroutine?  ");
    }

    #[test]
    fn rejects_blank_id() {
        let err = Question::new("   ", "text").unwrap_err();
        assert_eq!(err, QuestionError::EmptyId);
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new("q1", "\n\t").unwrap_err();
        assert!(matches!(err, QuestionError::EmptyText { id } if id.as_str() == "q1"));
    }
}
