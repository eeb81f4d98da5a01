mod bank;
mod ids;
mod question;

pub use bank::{QuestionBank, QuestionBankError};
pub use ids::{ChatId, QuestionId};
pub use question::{Question, QuestionError};
