use drill_core::model::Question;

/// Label of the "I know it" answer button.
pub const ANSWER_KNOWN: &str = "Знаю";
/// Label of the "I don't know it" answer button.
pub const ANSWER_UNKNOWN: &str = "Не знаю";

/// Reply keyboard change requested alongside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// Leave whatever keyboard the chat currently shows.
    Keep,
    /// Show the two answer buttons.
    Answer,
    /// Hide the keyboard.
    Remove,
}

impl Keyboard {
    /// Button rows for this keyboard, if it shows any.
    #[must_use]
    pub fn buttons(self) -> &'static [&'static [&'static str]] {
        match self {
            Keyboard::Answer => &[&[ANSWER_KNOWN, ANSWER_UNKNOWN]],
            Keyboard::Keep | Keyboard::Remove => &[],
        }
    }
}

/// A single outgoing chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    #[must_use]
    pub fn greeting() -> Self {
        Self::new(
            "Привет! Давай попрактикуемся в Android Kotlin.\n\
             Команды: /quiz — начать вопросы, /stop — остановить.\n\
             Отвечай кнопками 'Знаю' или 'Не знаю'.",
            Keyboard::Remove,
        )
    }

    #[must_use]
    pub fn lets_go() -> Self {
        Self::new("Поехали!", Keyboard::Answer)
    }

    #[must_use]
    pub fn question(question: &Question) -> Self {
        Self::new(question.text(), Keyboard::Answer)
    }

    #[must_use]
    pub fn completed() -> Self {
        Self::new(
            "Поздравляю! Ты прошёл весь пул вопросов. Напиши /quiz, чтобы пройти заново.",
            Keyboard::Remove,
        )
    }

    #[must_use]
    pub fn stopped() -> Self {
        Self::new(
            "Хорошо, останавливаюсь. Напиши /quiz, когда будешь готов продолжить. \
             Команда /start покажет подсказку заново.",
            Keyboard::Remove,
        )
    }

    #[must_use]
    pub fn not_started() -> Self {
        Self::new(
            "Мы ещё не начали. Напиши /start, чтобы увидеть команды, и /quiz — чтобы начать тренировку.",
            Keyboard::Keep,
        )
    }

    #[must_use]
    pub fn quiz_prompt() -> Self {
        Self::new(
            "Напиши /quiz, чтобы мы начали задавать вопросы. Команда /start напомнит доступные опции.",
            Keyboard::Keep,
        )
    }

    #[must_use]
    pub fn known_ack() -> Self {
        Self::new("Отлично! Идём дальше.", Keyboard::Keep)
    }

    #[must_use]
    pub fn unknown_ack() -> Self {
        Self::new("Ничего страшного — повторим позже!", Keyboard::Keep)
    }

    #[must_use]
    pub fn no_question_for_known() -> Self {
        Self::new(
            "Сейчас нет активного вопроса. Напиши /quiz, чтобы получить следующий вопрос.",
            Keyboard::Keep,
        )
    }

    #[must_use]
    pub fn no_question_for_unknown() -> Self {
        Self::new(
            "Похоже, нет активного вопроса. Напиши /quiz, чтобы продолжить.",
            Keyboard::Keep,
        )
    }

    #[must_use]
    pub fn help() -> Self {
        Self::new(
            "Я понимаю команды /start, /quiz, /stop и ответы 'Знаю' или 'Не знаю'.",
            Keyboard::Keep,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill::DrillCommand;

    #[test]
    fn answer_buttons_parse_back_to_answers() {
        let row = Keyboard::Answer.buttons()[0];
        assert_eq!(DrillCommand::parse(row[0]), DrillCommand::Known);
        assert_eq!(DrillCommand::parse(row[1]), DrillCommand::Unknown);
        assert!(Keyboard::Remove.buttons().is_empty());
    }

    #[test]
    fn greeting_spans_three_lines() {
        assert_eq!(Reply::greeting().text.lines().count(), 3);
    }
}
