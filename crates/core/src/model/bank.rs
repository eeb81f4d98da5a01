use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::model::{Question, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank is empty")]
    Empty,

    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),
}

/// Immutable, ordered set of questions shared by every session.
///
/// Cloning is cheap: clones share the same backing slice, and each question is
/// handed to sessions as an `Arc<Question>` rather than copied.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Arc<[Arc<Question>]>,
}

impl QuestionBank {
    /// Build a bank, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Empty` if no questions are provided.
    /// Returns `QuestionBankError::DuplicateId` if two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuestionBankError::DuplicateId(question.id().clone()));
            }
        }

        Ok(Self {
            questions: questions.into_iter().map(Arc::new).collect(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Shared handles to every question, in bank order.
    pub fn iter(&self) -> impl Iterator<Item = Arc<Question>> + '_ {
        self.questions.iter().cloned()
    }
}
