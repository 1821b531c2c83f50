//! Signal flags and job control
//!
//! Handlers only raise an atomic flag; everything else happens on the
//! main thread when it next polls for input. Handlers are installed
//! without `SA_RESTART` so a blocked `poll` returns early with `EINTR`.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{
    raise, sigaction, sigprocmask, SaFlags, SigAction, SigHandler, SigSet, SigmaskHow, Signal,
};
use tracing::{debug, warn};

use super::{UiError, UiResult};

/// A flag set from signal context and consumed on the main thread
#[derive(Debug)]
pub struct SignalFlag(AtomicBool);

impl SignalFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Set the flag. Async-signal-safe.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Test and clear
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

impl Default for SignalFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Raised by `SIGWINCH`
pub static RESIZE: SignalFlag = SignalFlag::new();
/// Raised by `SIGHUP`
pub static HANGUP: SignalFlag = SignalFlag::new();
/// Raised by a `SIGTSTP` sent from outside the process
pub static STOP: SignalFlag = SignalFlag::new();

extern "C" fn on_resize(_: libc::c_int) {
    RESIZE.raise();
}

extern "C" fn on_hangup(_: libc::c_int) {
    HANGUP.raise();
}

extern "C" fn on_stop(_: libc::c_int) {
    STOP.raise();
}

fn set_handler(signal: Signal, handler: SigHandler) -> UiResult<SigAction> {
    let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
    // SAFETY: the handlers only store to an atomic flag
    unsafe { sigaction(signal, &action) }.map_err(UiError::Signal)
}

/// Install the resize, hangup and stop handlers
pub fn install_handlers() -> UiResult<()> {
    set_handler(Signal::SIGWINCH, SigHandler::Handler(on_resize))?;
    set_handler(Signal::SIGHUP, SigHandler::Handler(on_hangup))?;
    set_handler(Signal::SIGTSTP, SigHandler::Handler(on_stop))?;
    debug!("signal handlers installed");
    Ok(())
}

/// Put the default dispositions back
pub fn restore_default_handlers() {
    for signal in [Signal::SIGWINCH, Signal::SIGHUP, Signal::SIGTSTP] {
        if let Err(err) = set_handler(signal, SigHandler::SigDfl) {
            warn!(?signal, %err, "failed to restore signal handler");
        }
    }
}

/// Stop the process through job control and return once resumed.
///
/// `SIGTSTP` gets its default disposition and is unblocked, then raised
/// against ourselves; execution continues here after `SIGCONT`. The
/// previous handler and signal mask are put back afterwards.
pub fn yield_to_job_control() -> UiResult<()> {
    let previous = set_handler(Signal::SIGTSTP, SigHandler::SigDfl)?;

    let mut unblock = SigSet::empty();
    unblock.add(Signal::SIGTSTP);
    let mut old_mask = SigSet::empty();
    sigprocmask(SigmaskHow::SIG_UNBLOCK, Some(&unblock), Some(&mut old_mask))
        .map_err(UiError::Signal)?;

    debug!("suspending");
    let stopped = raise(Signal::SIGTSTP).map_err(UiError::Signal);
    debug!("resumed");

    // SAFETY: reinstalling the handler that was in place before
    unsafe { sigaction(Signal::SIGTSTP, &previous) }.map_err(UiError::Signal)?;
    sigprocmask(SigmaskHow::SIG_SETMASK, Some(&old_mask), None).map_err(UiError::Signal)?;
    STOP.take();
    stopped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_flag_take_clears() {
        let flag = SignalFlag::new();
        assert!(!flag.is_raised());
        flag.raise();
        flag.raise();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.take());
    }
}
