#![forbid(unsafe_code)]

pub mod model;
pub mod session;

pub use model::{ChatId, Question, QuestionBank, QuestionBankError, QuestionError, QuestionId};
pub use session::DrillSession;
