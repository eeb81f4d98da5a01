mod command;
mod reply;
mod service;

// Public API of the drill subsystem.
pub use command::DrillCommand;
pub use reply::{ANSWER_KNOWN, ANSWER_UNKNOWN, Keyboard, Reply};
pub use service::DrillService;
