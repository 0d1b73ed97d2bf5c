use crate::common::constants::WAKE_CONNECT_TIMEOUT_MS;
use crate::common::error::{AcceptError, Result, ServerError};
use crate::core::net::fd::FileDescriptor;
use std::io::{self, ErrorKind};
use std::mem;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::os::unix::io::{AsRawFd, FromRawFd};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// A listening TCP socket shared by every worker.
///
/// `accept` may be called concurrently from many threads. `close` flips the
/// socket into a terminal state where every pending and future `accept`
/// returns `AcceptError::Closed`.
pub struct ListeningSocket {
    listener: TcpListener,
    local_addr: SocketAddr,
    closed: AtomicBool,
    /// Threads currently inside `accept`.
    waiting: AtomicUsize,
}

impl ListeningSocket {
    pub fn bind(addr: SocketAddr, backlog: u32) -> Result<Self> {
        let backlog = libc::c_int::try_from(backlog).map_err(|_| {
            ServerError::ConfigError(format!("backlog {} exceeds the kernel limit", backlog))
        })?;
        let bind_error = |source: io::Error| ServerError::BindError { addr, source };

        let domain = match addr {
            SocketAddr::V4(_) => libc::AF_INET,
            SocketAddr::V6(_) => libc::AF_INET6,
        };
        let fd = FileDescriptor::socket(domain).map_err(bind_error)?;
        fd.set_cloexec()?;
        fd.set_reuse_addr()?;

        let (storage, len) = socket_addr_to_raw(&addr);
        let rc = unsafe {
            libc::bind(
                fd.as_raw_fd(),
                &storage as *const libc::sockaddr_storage as *const libc::sockaddr,
                len,
            )
        };
        if rc < 0 {
            return Err(bind_error(io::Error::last_os_error()));
        }

        if unsafe { libc::listen(fd.as_raw_fd(), backlog) } < 0 {
            return Err(bind_error(io::Error::last_os_error()));
        }

        // The TcpListener owns the descriptor from here on and closes it once.
        let listener = unsafe { TcpListener::from_raw_fd(fd.into_raw()) };
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            closed: AtomicBool::new(false),
            waiting: AtomicUsize::new(0),
        })
    }

    /// Block until a connection arrives or the socket is closed.
    pub fn accept(&self) -> std::result::Result<(TcpStream, SocketAddr), AcceptError> {
        self.waiting.fetch_add(1, Ordering::SeqCst);
        let result = self.accept_inner();
        self.waiting.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn accept_inner(&self) -> std::result::Result<(TcpStream, SocketAddr), AcceptError> {
        loop {
            if self.is_closed() {
                return Err(AcceptError::Closed);
            }

            match self.listener.accept() {
                // Wake-up connects and late arrivals are dropped unanswered.
                Ok(_) if self.is_closed() => return Err(AcceptError::Closed),
                Ok(accepted) => return Ok(accepted),
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) if self.is_closed() => return Err(AcceptError::Closed),
                Err(e) => return Err(AcceptError::Io(e)),
            }
        }
    }

    /// Close the socket for accepting. Returns `false` if it was already
    /// closed.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }

        // On Linux this alone fails every blocked accept with EINVAL.
        let _ = FileDescriptor::new(self.listener.as_raw_fd()).shutdown();

        // Elsewhere a blocked accept only returns once a peer shows up.
        let wake_addr = wake_address(self.local_addr);
        let timeout = Duration::from_millis(WAKE_CONNECT_TIMEOUT_MS);
        let blocked = self.waiting.load(Ordering::SeqCst);
        for _ in 0..blocked {
            if TcpStream::connect_timeout(&wake_addr, timeout).is_err() {
                break;
            }
        }
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

/// Loopback address reaching a socket bound to `addr`.
fn wake_address(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), addr.port())
        }
        _ => addr,
    }
}

fn socket_addr_to_raw(addr: &SocketAddr) -> (libc::sockaddr_storage, libc::socklen_t) {
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };

    let len = match addr {
        SocketAddr::V4(v4) => {
            let sin = &mut storage as *mut libc::sockaddr_storage as *mut libc::sockaddr_in;
            unsafe {
                (*sin).sin_family = libc::AF_INET as libc::sa_family_t;
                (*sin).sin_port = v4.port().to_be();
                (*sin).sin_addr = libc::in_addr {
                    s_addr: u32::from_ne_bytes(v4.ip().octets()),
                };
                #[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
                {
                    (*sin).sin_len = mem::size_of::<libc::sockaddr_in>() as u8;
                }
            }
            mem::size_of::<libc::sockaddr_in>()
        }
        SocketAddr::V6(v6) => {
            let sin6 = &mut storage as *mut libc::sockaddr_storage as *mut libc::sockaddr_in6;
            unsafe {
                (*sin6).sin6_family = libc::AF_INET6 as libc::sa_family_t;
                (*sin6).sin6_port = v6.port().to_be();
                (*sin6).sin6_addr = libc::in6_addr {
                    s6_addr: v6.ip().octets(),
                };
                (*sin6).sin6_flowinfo = v6.flowinfo();
                (*sin6).sin6_scope_id = v6.scope_id();
                #[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
                {
                    (*sin6).sin6_len = mem::size_of::<libc::sockaddr_in6>() as u8;
                }
            }
            mem::size_of::<libc::sockaddr_in6>()
        }
    };

    (storage, len as libc::socklen_t)
}
