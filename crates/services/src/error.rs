//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;

/// Errors emitted by a `ChatTransport`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
    #[error("failed to deliver message: {0}")]
    Send(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors emitted while handling an incoming message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors emitted while bootstrapping the drill service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BootstrapError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
