use crate::common::constants::DEFAULT_BUFFER_SIZE;
use crate::common::error::{ReadError, WriteError};
use crate::core::net::io::{read_retrying, write_fully};
use std::fmt;
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier attached to every accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One accepted client socket, owned by the worker that accepted it.
pub struct Connection {
    id: ConnectionId,
    stream: Option<TcpStream>,
    peer_addr: SocketAddr,
}

impl Connection {
    pub fn new(stream: TcpStream, peer_addr: SocketAddr) -> Self {
        Self {
            id: ConnectionId::next(),
            stream: Some(stream),
            peer_addr,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Read whatever the peer has sent, in a single read call.
    ///
    /// `timeout` of `None` (or zero) blocks until data arrives or the peer
    /// goes away. Zero bytes read is the peer closing, never an empty request.
    pub fn read_request(&mut self, timeout: Option<Duration>) -> Result<Vec<u8>, ReadError> {
        let stream = self.stream.as_mut().ok_or(ReadError::Closed)?;

        let timeout = timeout.filter(|t| !t.is_zero());
        stream.set_read_timeout(timeout).map_err(ReadError::Transport)?;

        let mut buf = vec![0u8; DEFAULT_BUFFER_SIZE];
        match read_retrying(stream, &mut buf) {
            Ok(0) => Err(ReadError::Closed),
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                Err(ReadError::Timeout)
            }
            Err(e) => Err(ReadError::Transport(e)),
        }
    }

    pub fn write_response(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        let stream = self.stream.as_mut().ok_or(WriteError::Closed)?;
        write_fully(stream, bytes).map_err(WriteError::Transport)
    }

    /// Release the socket. Only the first call does anything and returns
    /// `true`; it is safe after any earlier failure.
    pub fn close(&mut self) -> bool {
        match self.stream.take() {
            Some(stream) => {
                // Flush our FIN before the descriptor goes away.
                let _ = stream.shutdown(Shutdown::Write);
                true
            }
            None => false,
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("peer_addr", &self.peer_addr)
            .field("closed", &self.is_closed())
            .finish()
    }
}
