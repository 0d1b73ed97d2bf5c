use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors that reach a startup or shutdown boundary. Every variant is fatal
/// for the process; per-connection failures use the enums below instead.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to bind to {addr}: {source}")]
    BindError {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn {name}: {source}")]
    SpawnError {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to join {0}: thread panicked")]
    WorkerJoinError(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Outcome of a failed `accept`.
#[derive(Debug, Error)]
pub enum AcceptError {
    /// The listener was closed; workers should leave their loop.
    #[error("listener closed")]
    Closed,

    #[error("accept failed: {0}")]
    Io(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum ReadError {
    /// Peer closed the connection without sending anything.
    #[error("connection closed by peer")]
    Closed,

    #[error("read timed out")]
    Timeout,

    #[error("read failed: {0}")]
    Transport(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("connection already closed")]
    Closed,

    #[error("write failed: {0}")]
    Transport(#[source] io::Error),
}
