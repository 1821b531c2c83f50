//! Unix terminal implementation
//!
//! Raw mode through termios, input reads gated by `poll`, and the window
//! size read from `/dev/tty` with `TIOCGWINSZ`.

use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal, Read, Stdout, Write};
use std::os::fd::{AsFd, AsRawFd};
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::sys::termios::{self, SetArg, Termios};
use tracing::{debug, warn};

use super::signals::{self, HANGUP, RESIZE, STOP};
use super::{Terminal, UiError, UiResult, WindowSize};
use crate::parser::ByteSource;

/// The controlling terminal, attached to stdin and stdout
pub struct Tty {
    /// Duplicate of stdin, read unbuffered
    input: File,
    output: Stdout,
    /// Mode found at startup
    original: Termios,
}

impl Tty {
    /// Attach to the terminal and install the signal handlers.
    ///
    /// Fails when stdout is not a terminal.
    pub fn open() -> UiResult<Self> {
        if !io::stdout().is_terminal() {
            return Err(UiError::NotATty);
        }

        let input = File::from(io::stdin().as_fd().try_clone_to_owned()?);
        let original = termios::tcgetattr(input.as_fd()).map_err(UiError::Termios)?;
        signals::install_handlers()?;

        debug!("terminal opened");
        Ok(Self {
            input,
            output: io::stdout(),
            original,
        })
    }

    /// Poll stdin for readability
    fn poll_input(&self, timeout: PollTimeout) -> bool {
        let mut fds = [PollFd::new(self.input.as_fd(), PollFlags::POLLIN)];
        match poll(&mut fds, timeout) {
            Ok(n) if n > 0 => {
                let revents = fds[0].revents().unwrap_or(PollFlags::empty());
                if revents.contains(PollFlags::POLLHUP) && !revents.contains(PollFlags::POLLIN) {
                    HANGUP.raise();
                    return false;
                }
                revents.contains(PollFlags::POLLIN)
            },
            Ok(_) => false,
            Err(Errno::EINTR) => false,
            Err(err) => {
                warn!(%err, "poll on stdin failed");
                false
            },
        }
    }
}

fn poll_timeout(timeout: Option<Duration>) -> PollTimeout {
    match timeout {
        None => PollTimeout::NONE,
        Some(duration) => {
            let ms = duration.as_millis().min(u128::from(u16::MAX)) as u16;
            PollTimeout::from(ms)
        },
    }
}

impl ByteSource for Tty {
    fn next_byte(&mut self, wait: Duration) -> Option<u8> {
        if !self.poll_input(poll_timeout(Some(wait))) {
            return None;
        }
        let mut byte = [0u8; 1];
        match self.input.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => {
                HANGUP.raise();
                None
            },
            Err(err) => {
                if err.kind() != io::ErrorKind::Interrupted {
                    warn!(%err, "read from stdin failed");
                }
                None
            },
        }
    }
}

impl Write for Tty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.output.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

impl Terminal for Tty {
    fn window_size(&mut self) -> Option<WindowSize> {
        let tty = match OpenOptions::new().read(true).write(true).open("/dev/tty") {
            Ok(tty) => tty,
            Err(err) => {
                warn!(%err, "cannot open /dev/tty");
                return None;
            },
        };

        let mut ws = libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        // SAFETY: TIOCGWINSZ writes a winsize into the pointed-to struct
        let result = unsafe { libc::ioctl(tty.as_raw_fd(), libc::TIOCGWINSZ, &mut ws) };
        if result != 0 {
            warn!(err = %io::Error::last_os_error(), "TIOCGWINSZ failed");
            return None;
        }
        Some(WindowSize::from(ws))
    }

    fn set_raw_mode(&mut self) -> UiResult<()> {
        let mut attr = self.original.clone();
        attr.input_flags &= !(termios::InputFlags::IGNBRK
            | termios::InputFlags::BRKINT
            | termios::InputFlags::PARMRK
            | termios::InputFlags::ISTRIP
            | termios::InputFlags::INLCR
            | termios::InputFlags::IGNCR
            | termios::InputFlags::ICRNL
            | termios::InputFlags::IXON);
        attr.output_flags &= !termios::OutputFlags::OPOST;
        attr.local_flags &= !(termios::LocalFlags::ECHO
            | termios::LocalFlags::ECHONL
            | termios::LocalFlags::ICANON
            | termios::LocalFlags::ISIG
            | termios::LocalFlags::IEXTEN);
        attr.local_flags |= termios::LocalFlags::NOFLSH;
        attr.control_flags &= !(termios::ControlFlags::CSIZE | termios::ControlFlags::PARENB);
        attr.control_flags |= termios::ControlFlags::CS8;
        attr.control_chars[termios::SpecialCharacterIndices::VMIN as usize] = 0;
        attr.control_chars[termios::SpecialCharacterIndices::VTIME as usize] = 0;

        termios::tcsetattr(self.input.as_fd(), SetArg::TCSAFLUSH, &attr).map_err(UiError::Termios)
    }

    fn restore_mode(&mut self) -> UiResult<()> {
        termios::tcsetattr(self.input.as_fd(), SetArg::TCSAFLUSH, &self.original)
            .map_err(UiError::Termios)
    }

    fn yield_to_job_control(&mut self) {
        if let Err(err) = signals::yield_to_job_control() {
            warn!(%err, "job control yield failed");
        }
    }

    fn wait_for_input(&mut self, timeout: Option<Duration>) -> bool {
        self.poll_input(poll_timeout(timeout))
    }

    fn take_resize(&mut self) -> bool {
        RESIZE.take()
    }

    fn take_stop(&mut self) -> bool {
        STOP.take()
    }

    fn hung_up(&self) -> bool {
        HANGUP.is_raised()
    }
}

impl Drop for Tty {
    fn drop(&mut self) {
        let _ = self.output.flush();
        if let Err(err) = self.restore_mode() {
            warn!(%err, "failed to restore terminal mode");
        }
        signals::restore_default_handlers();
    }
}
