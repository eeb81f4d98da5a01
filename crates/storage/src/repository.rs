use async_trait::async_trait;
use drill_core::model::{Question, QuestionBank, QuestionBankError, QuestionError};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while loading the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("question file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),

    #[error(transparent)]
    Bank(#[from] QuestionBankError),
}

/// Persisted shape of a question.
///
/// Field names are matched ignoring case (`id`, `Id`, `ID` all load); unknown
/// fields are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: String,
    pub text: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Convert the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id or text is blank.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(self.id, self.text)
    }
}

impl<'de> Deserialize<'de> for QuestionRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = QuestionRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a question object with `id` and `text`")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut id: Option<String> = None;
                let mut text: Option<String> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.to_lowercase().as_str() {
                        "id" => {
                            if id.is_some() {
                                return Err(de::Error::duplicate_field("id"));
                            }
                            id = Some(map.next_value()?);
                        }
                        "text" => {
                            if text.is_some() {
                                return Err(de::Error::duplicate_field("text"));
                            }
                            text = Some(map.next_value()?);
                        }
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }

                Ok(QuestionRecord {
                    id: id.ok_or_else(|| de::Error::missing_field("id"))?,
                    text: text.ok_or_else(|| de::Error::missing_field("text"))?,
                })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Build a bank from records, keeping their order.
///
/// # Errors
///
/// Returns `StorageError::InvalidQuestion` for a blank record and
/// `StorageError::Bank` for an empty or duplicated collection.
pub fn bank_from_records(
    records: impl IntoIterator<Item = QuestionRecord>,
) -> Result<QuestionBank, StorageError> {
    let questions = records
        .into_iter()
        .map(QuestionRecord::into_question)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QuestionBank::new(questions)?)
}

/// Source contract for the question bank, loaded once at startup.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Load and validate the full bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source is missing, malformed, or empty.
    async fn load(&self) -> Result<QuestionBank, StorageError>;
}

/// Simple in-memory source for testing and prototyping.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<QuestionRecord>,
}

impl InMemorySource {
    #[must_use]
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl QuestionSource for InMemorySource {
    async fn load(&self) -> Result<QuestionBank, StorageError> {
        bank_from_records(self.records.iter().cloned())
    }
}
