//! Fixed worker-pool TCP server.
//!
//! A set of OS threads shares one listening socket; each accepts a
//! connection, reads one request, passes it to a [`RequestHandler`], writes
//! the response and closes the connection.
//!
//! - `core`: raw sockets, connections, byte I/O, signal handling
//! - `application::server`: listener, worker pool, server lifecycle
//! - `application::handler`: the handler interface and stock handlers
//! - `application::config`: TOML and command-line configuration
//! - `common`: errors, logging, constants

pub mod application;
pub mod common;
pub mod core;

pub use application::config::{Config, ListenAddress, ServerConfig};
pub use application::handler::{RequestHandler, RequestOutcome};
pub use application::server::{Server, ShutdownHandle};
pub use common::error::{Result, ServerError};
