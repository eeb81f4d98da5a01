#![forbid(unsafe_code)]

pub mod directory;
pub mod drill;
pub mod error;
pub mod transport;

pub use directory::{SessionDirectory, SessionGuard, SessionHandle};
pub use drill::{DrillCommand, DrillService, Keyboard, Reply};
pub use error::{BootstrapError, DispatchError, TransportError};
pub use transport::{BOT_COMMANDS, BotCommand, ChatTransport, IncomingMessage, RecordingTransport};
