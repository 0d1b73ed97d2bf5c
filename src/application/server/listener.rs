use crate::application::config::models::ListenAddress;
use crate::common::error::{AcceptError, Result};
use crate::core::net::connection::Connection;
use crate::core::net::socket::ListeningSocket;
use std::net::SocketAddr;

/// The server's one listening socket, shared by every worker
pub struct Listener {
    socket: ListeningSocket,
}

impl Listener {
    /// Bind and listen. Failure here is fatal for the server.
    pub fn bind(addr: ListenAddress, backlog: u32) -> Result<Self> {
        let socket = ListeningSocket::bind(addr.socket_addr(), backlog)?;

        tracing::info!(
            configured = %addr,
            address = %socket.local_addr(),
            backlog,
            "Listener bound"
        );

        Ok(Self { socket })
    }

    /// Block until the next client connects.
    ///
    /// Returns `AcceptError::Closed` once `close` has been called, including
    /// for calls that were already waiting.
    pub fn accept(&self) -> std::result::Result<Connection, AcceptError> {
        let (stream, peer_addr) = self.socket.accept()?;
        Ok(Connection::new(stream, peer_addr))
    }

    /// Stop accepting. Safe to call any number of times.
    pub fn close(&self) {
        if self.socket.close() {
            tracing::debug!(address = %self.socket.local_addr(), "Listener closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.socket.is_closed()
    }

    /// Address actually bound, with the real port when bound to port 0
    pub fn local_addr(&self) -> SocketAddr {
        self.socket.local_addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpStream;
    use std::time::Duration;

    #[test]
    fn test_accept_wraps_connection() {
        let listener = Listener::bind(ListenAddress::localhost(0), 1).unwrap();
        let mut client = TcpStream::connect(listener.local_addr()).unwrap();
        client.write_all(b"hi").unwrap();

        let mut conn = listener.accept().unwrap();
        assert_eq!(conn.peer_addr(), client.local_addr().unwrap());
        assert_eq!(conn.read_request(Some(Duration::from_secs(5))).unwrap(), b"hi");
    }

    #[test]
    fn test_closed_listener_reports_closed() {
        let listener = Listener::bind(ListenAddress::localhost(0), 1).unwrap();
        listener.close();
        listener.close();
        assert!(listener.is_closed());
        assert!(matches!(listener.accept(), Err(AcceptError::Closed)));
    }
}
