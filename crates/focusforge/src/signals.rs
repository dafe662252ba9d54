//! Signal flags
//!
//! SIGINT/SIGTERM clear the running flag and remember the signal number;
//! SIGWINCH raises the resize flag. Handlers only store into atomics. The
//! main loop polls and clears the flags once per iteration.

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

static RUNNING: AtomicBool = AtomicBool::new(true);
static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);
static TERMINATE_SIGNAL: AtomicI32 = AtomicI32::new(0);

extern "C" fn handle_terminate(sig: libc::c_int) {
    TERMINATE_SIGNAL.store(sig, Ordering::SeqCst);
    RUNNING.store(false, Ordering::SeqCst);
}

extern "C" fn handle_resize(_: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::SeqCst);
}

/// Install the handlers. Must run before the terminal event source starts
/// so crossterm chains onto our SIGWINCH handler rather than replacing it.
pub fn install() -> Result<()> {
    install_handler(libc::SIGINT, handle_terminate)?;
    install_handler(libc::SIGTERM, handle_terminate)?;
    install_handler(libc::SIGWINCH, handle_resize)?;
    Ok(())
}

fn install_handler(sig: libc::c_int, handler: extern "C" fn(libc::c_int)) -> Result<()> {
    // SAFETY: the sigaction struct is zero-initialised then filled in; the
    // handler only touches atomics.
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handler as *const () as libc::sighandler_t;
        action.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut action.sa_mask);
        if libc::sigaction(sig, &action, std::ptr::null_mut()) == -1 {
            let err = std::io::Error::last_os_error();
            tracing::error!(signal = sig, error = %err, "failed to install signal handler");
            return Err(anyhow!("failed to install handler for signal {}: {}", sig, err));
        }
    }
    Ok(())
}

pub fn running() -> bool {
    RUNNING.load(Ordering::SeqCst)
}

/// Signal that stopped the loop, if any
pub fn terminate_signal() -> Option<i32> {
    match TERMINATE_SIGNAL.load(Ordering::SeqCst) {
        0 => None,
        sig => Some(sig),
    }
}

/// Mark a resize as pending (crossterm resize events land here too)
pub fn request_resize() {
    RESIZE_PENDING.store(true, Ordering::SeqCst);
}

/// Read and clear the resize flag
pub fn take_resize() -> bool {
    RESIZE_PENDING.swap(false, Ordering::SeqCst)
}
