pub mod connection;
pub mod fd;
pub mod io;
pub mod socket;

pub use connection::{Connection, ConnectionId};
pub use socket::ListeningSocket;
