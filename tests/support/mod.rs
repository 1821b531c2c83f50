//! In-memory terminal for driving `TerminalUi` in tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use ansi_ui::parser::{ByteSource, SliceSource};
use ansi_ui::{Terminal, UiResult, WindowSize};

/// Something that happened to the terminal, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Bytes written and flushed together
    Output(Vec<u8>),
    RawMode,
    RestoreMode,
    Yield,
}

#[derive(Debug, Default)]
pub struct State {
    pub events: Vec<Event>,
    pending: Vec<u8>,
    pub input: SliceSource,
    pub size: Option<WindowSize>,
    pub resize: bool,
    pub stop: bool,
    pub hangup: bool,
    pub raw: bool,
}

impl State {
    /// Every byte flushed so far
    pub fn output(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Output(bytes) => Some(bytes.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }

    /// Flushed output as text, then forget all events
    pub fn take_output(&mut self) -> String {
        let output = String::from_utf8_lossy(&self.output()).into_owned();
        self.events.clear();
        output
    }

    pub fn flush_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::Output(_)))
            .count()
    }
}

/// Terminal double sharing its state with the test
#[derive(Debug, Clone)]
pub struct FakeTerminal(pub Rc<RefCell<State>>);

impl FakeTerminal {
    pub fn new(rows: u16, cols: u16) -> (Self, Rc<RefCell<State>>) {
        let state = Rc::new(RefCell::new(State {
            size: Some(WindowSize::new(rows, cols)),
            ..State::default()
        }));
        (Self(Rc::clone(&state)), state)
    }
}

impl Write for FakeTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.0.borrow_mut();
        let bytes = std::mem::take(&mut state.pending);
        if !bytes.is_empty() {
            state.events.push(Event::Output(bytes));
        }
        Ok(())
    }
}

impl ByteSource for FakeTerminal {
    fn next_byte(&mut self, wait: Duration) -> Option<u8> {
        self.0.borrow_mut().input.next_byte(wait)
    }
}

impl Terminal for FakeTerminal {
    fn window_size(&mut self) -> Option<WindowSize> {
        self.0.borrow().size
    }

    fn set_raw_mode(&mut self) -> UiResult<()> {
        let mut state = self.0.borrow_mut();
        state.raw = true;
        state.events.push(Event::RawMode);
        Ok(())
    }

    fn restore_mode(&mut self) -> UiResult<()> {
        let mut state = self.0.borrow_mut();
        state.raw = false;
        state.events.push(Event::RestoreMode);
        Ok(())
    }

    fn yield_to_job_control(&mut self) {
        self.0.borrow_mut().events.push(Event::Yield);
    }

    fn wait_for_input(&mut self, _timeout: Option<Duration>) -> bool {
        !self.0.borrow().input.is_empty()
    }

    fn take_resize(&mut self) -> bool {
        std::mem::take(&mut self.0.borrow_mut().resize)
    }

    fn take_stop(&mut self) -> bool {
        std::mem::take(&mut self.0.borrow_mut().stop)
    }

    fn hung_up(&self) -> bool {
        self.0.borrow().hangup
    }
}
