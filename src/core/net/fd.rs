use crate::common::error::{Result, ServerError};
use std::io;
use std::mem;
use std::os::unix::io::{AsRawFd, RawFd};

/// Raw socket handle that is closed exactly once, on drop, unless ownership
/// has been handed to someone else with `into_raw`.
pub struct FileDescriptor {
    fd: RawFd,
    owned: bool,
}

impl FileDescriptor {
    /// Borrow a descriptor owned elsewhere; dropping this never closes it.
    pub fn new(fd: RawFd) -> Self {
        Self { fd, owned: false }
    }

    pub fn from_raw(fd: RawFd) -> Self {
        Self { fd, owned: true }
    }

    /// Create a TCP socket for the given address family.
    pub fn socket(domain: libc::c_int) -> io::Result<Self> {
        let fd = unsafe { libc::socket(domain, libc::SOCK_STREAM, 0) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self::from_raw(fd))
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.fd
    }

    /// Give up ownership; the caller becomes responsible for closing.
    pub fn into_raw(mut self) -> RawFd {
        self.owned = false;
        self.fd
    }

    pub fn set_cloexec(&self) -> Result<()> {
        unsafe {
            let flags = libc::fcntl(self.fd, libc::F_GETFD);
            if flags < 0 {
                return Err(ServerError::IoError(io::Error::last_os_error()));
            }

            if libc::fcntl(self.fd, libc::F_SETFD, flags | libc::FD_CLOEXEC) < 0 {
                return Err(ServerError::IoError(io::Error::last_os_error()));
            }
        }
        Ok(())
    }

    pub fn set_reuse_addr(&self) -> Result<()> {
        let enable: libc::c_int = 1;
        let rc = unsafe {
            libc::setsockopt(
                self.fd,
                libc::SOL_SOCKET,
                libc::SO_REUSEADDR,
                &enable as *const libc::c_int as *const libc::c_void,
                mem::size_of::<libc::c_int>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(ServerError::IoError(io::Error::last_os_error()));
        }
        Ok(())
    }

    /// `shutdown(2)` both directions. Errors such as `ENOTCONN` are returned
    /// to the caller, which usually ignores them.
    pub fn shutdown(&self) -> io::Result<()> {
        if unsafe { libc::shutdown(self.fd, libc::SHUT_RDWR) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl AsRawFd for FileDescriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for FileDescriptor {
    fn drop(&mut self) {
        if self.owned && self.fd >= 0 {
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}
