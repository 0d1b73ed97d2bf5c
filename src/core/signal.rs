//! SIGINT/SIGTERM handling for the binary.
//!
//! The handler only stores into an atomic; the main thread polls
//! `shutdown_requested` and runs the actual shutdown. `SA_RESTART` is left
//! unset, so blocked socket calls see `EINTR` and retry on their own.

use crate::common::error::{Result, ServerError};
use std::io;
use std::mem;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_shutdown_signal(_signal: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

pub fn install_shutdown_handlers() -> Result<()> {
    for signal in [libc::SIGINT, libc::SIGTERM] {
        install(signal, on_shutdown_signal)?;
    }
    Ok(())
}

fn install(signal: libc::c_int, handler: extern "C" fn(libc::c_int)) -> Result<()> {
    unsafe {
        let mut action: libc::sigaction = mem::zeroed();
        action.sa_sigaction = handler as libc::sighandler_t;
        action.sa_flags = 0;
        libc::sigemptyset(&mut action.sa_mask);

        if libc::sigaction(signal, &action, ptr::null_mut()) != 0 {
            return Err(ServerError::IoError(io::Error::last_os_error()));
        }
    }
    Ok(())
}

pub fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
}
