use std::path::{Path, PathBuf};

use async_trait::async_trait;
use drill_core::model::QuestionBank;

use crate::repository::{QuestionRecord, QuestionSource, StorageError, bank_from_records};

/// Default location of the question file, relative to the working directory.
pub const DEFAULT_QUESTIONS_PATH: &str = "data/questions.json";

/// Loads the bank from a JSON array of `{ "id": ..., "text": ... }` records.
///
/// The path is tried as given first. A relative path that does not exist is
/// then tried against the base directory (by default, the directory holding
/// the running executable).
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    base_dir: Option<PathBuf>,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let base_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self {
            path: path.into(),
            base_dir,
        }
    }

    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Candidate locations in lookup order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.path.clone()];
        if self.path.is_relative() {
            if let Some(base) = &self.base_dir {
                paths.push(base.join(&self.path));
            }
        }
        paths
    }

    async fn resolve(&self) -> Result<PathBuf, StorageError> {
        for candidate in self.candidates() {
            if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
                return Ok(candidate);
            }
        }
        Err(StorageError::NotFound {
            path: self.path.clone(),
        })
    }
}

impl Default for JsonFileSource {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTIONS_PATH)
    }
}

/// Parse a question file body into a bank.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON, and the usual
/// validation errors for blank, empty, or duplicated records.
pub fn parse_questions(bytes: &[u8]) -> Result<QuestionBank, StorageError> {
    let records: Vec<QuestionRecord> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))?;
    bank_from_records(records)
}

#[async_trait]
impl QuestionSource for JsonFileSource {
    async fn load(&self) -> Result<QuestionBank, StorageError> {
        let path = self.resolve().await?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| StorageError::Io { path, source })?;
        parse_questions(&bytes)
    }
}
