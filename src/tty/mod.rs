//! Terminal device handling
//!
//! This module owns everything that talks to the operating system: raw
//! mode, readiness-gated input reads, window size queries, signal flags
//! and job control. The session controller only sees the [`Terminal`]
//! trait, so it can be driven by an in-memory terminal in tests.

use std::io::Write;
use std::time::Duration;

use crate::core::DisplayCoord;
use crate::parser::ByteSource;

pub mod signals;

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::Tty;

/// Error type for terminal operations
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("stdout is not a tty")]
    NotATty,

    #[error("Failed to access terminal attributes: {0}")]
    Termios(#[source] nix::Error),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] nix::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for terminal operations
pub type UiResult<T> = Result<T, UiError>;

/// Terminal size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
}

impl WindowSize {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Size as a (lines, columns) coordinate
    pub fn to_coord(self) -> DisplayCoord {
        DisplayCoord::new(i32::from(self.rows), i32::from(self.cols))
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(24, 80)
    }
}

#[cfg(unix)]
impl From<libc::winsize> for WindowSize {
    fn from(ws: libc::winsize) -> Self {
        Self::new(ws.ws_row, ws.ws_col)
    }
}

/// What the session controller needs from a terminal.
///
/// Output goes through [`Write`]; the controller buffers a whole frame
/// and writes it with a single flush. Input bytes come through
/// [`ByteSource`]. The pending-signal queries consume their flag.
pub trait Terminal: Write + ByteSource {
    /// Current size, or `None` when it cannot be queried right now
    fn window_size(&mut self) -> Option<WindowSize>;

    /// Switch the input to raw mode
    fn set_raw_mode(&mut self) -> UiResult<()>;

    /// Restore the terminal mode found at startup
    fn restore_mode(&mut self) -> UiResult<()>;

    /// Stop the process until the shell resumes it
    fn yield_to_job_control(&mut self);

    /// Block until input is readable, the timeout expires or a signal
    /// arrives. Returns true when input is readable.
    fn wait_for_input(&mut self, timeout: Option<Duration>) -> bool;

    /// Test and clear the pending resize notification
    fn take_resize(&mut self) -> bool;

    /// Test and clear a stop request delivered from outside
    fn take_stop(&mut self) -> bool;

    /// True once the controlling terminal went away
    fn hung_up(&self) -> bool;
}
