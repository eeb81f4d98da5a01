#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{DEFAULT_QUESTIONS_PATH, JsonFileSource, parse_questions};
pub use repository::{
    InMemorySource, QuestionRecord, QuestionSource, StorageError, bank_from_records,
};
