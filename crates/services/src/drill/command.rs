/// What a chat message asks the drill to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillCommand {
    /// Show the greeting and start over, stopped.
    Start,
    /// Begin or resume asking questions.
    Quiz,
    /// Pause the drill.
    Stop,
    /// The user knows the current question.
    Known,
    /// The user does not know the current question.
    Unknown,
    /// Anything else.
    Fallback,
}

const START: &[&str] = &["/start"];
const QUIZ: &[&str] = &["/quiz", "начать"];
const STOP: &[&str] = &["/stop", "стоп"];
const KNOWN: &[&str] = &["знаю"];
const UNKNOWN: &[&str] = &["не знаю", "не знаю."];

impl DrillCommand {
    /// Normalize free text into a command.
    ///
    /// Matching is on the whole trimmed message, ignoring case (Unicode-aware,
    /// so keyboard buttons like `Знаю` match `знаю`).
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let normalized = text.trim().to_lowercase();
        let matches = |candidates: &[&str]| candidates.iter().any(|c| *c == normalized);

        if matches(START) {
            Self::Start
        } else if matches(QUIZ) {
            Self::Quiz
        } else if matches(STOP) {
            Self::Stop
        } else if matches(KNOWN) {
            Self::Known
        } else if matches(UNKNOWN) {
            Self::Unknown
        } else {
            Self::Fallback
        }
    }
}
