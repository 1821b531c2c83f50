//! Session controller
//!
//! [`TerminalUi`] owns the three windows (content, menu, info), the
//! hardware cursor and the terminal modes. Editor draw requests update the
//! windows; [`TerminalUi::refresh`] composes them into one output buffer
//! and writes it with a single flush.
//!
//! Mode transitions:
//!
//! ```text
//! Normal (raw, alternate screen, mouse on)
//!   -> Suspended (original mode, process stopped) -> Normal
//!   -> Terminated (on drop: mouse off, main screen, original mode)
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::UiOptions;
use crate::core::sgr::write_cursor_pos;
use crate::core::{merge_faces, DisplayAtom, DisplayCoord, DisplayLine, Face, Window};
use crate::layout::{Info, InfoStyle, Menu, MenuStyle, ScreenLayout};
use crate::parser::{Decoded, InputDecoder, Key};
use crate::tty::{Terminal, UiResult};

const ENTER_ALTERNATE_SCREEN: &[u8] = b"\x1b[?1049h\x1b[?25l";
const LEAVE_ALTERNATE_SCREEN: &[u8] = b"\x1b[?1049l\x1b[?25h\x1b[m";
/// SGR reporting, focus events, button events, drag motion
const MOUSE_ON: &[u8] = b"\x1b[?1006h\x1b[?1004h\x1b[?1000h\x1b[?1002h";
const MOUSE_OFF: &[u8] = b"\x1b[?1002l\x1b[?1000l\x1b[?1004l\x1b[?1006l";

/// Longest title text sent to the terminal, in bytes
const MAX_TITLE_LEN: usize = 511;

/// Where the hardware cursor goes after a refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorMode {
    /// Content-relative coordinate
    #[default]
    Buffer,
    /// Column on the status line
    Prompt,
}

type KeyCallback = Box<dyn FnMut(Key)>;

/// Terminal user interface over any [`Terminal`]
pub struct TerminalUi<T: Terminal> {
    terminal: T,
    decoder: InputDecoder,
    options: UiOptions,
    layout: ScreenLayout,

    window: Window,
    menu: Menu,
    info: Info,

    cursor_mode: CursorMode,
    cursor: DisplayCoord,
    /// Display width of the last status line drawn
    status_len: i32,

    /// Pending escape sequences, written out on the next flush
    output: Vec<u8>,
    /// Latest title from `draw_status`, sent with the next redraw
    pending_title: Option<String>,
    dirty: bool,
    resize_pending: bool,
    mouse_enabled: bool,
    detached: bool,
    on_key: Option<KeyCallback>,
}

#[cfg(unix)]
impl TerminalUi<crate::tty::Tty> {
    /// Take over the controlling terminal.
    ///
    /// Fails when stdout is not a terminal.
    pub fn open(options: UiOptions) -> UiResult<Self> {
        Self::new(crate::tty::Tty::open()?, options)
    }
}

impl<T: Terminal> TerminalUi<T> {
    /// Enter the alternate screen and raw mode, then draw an empty frame
    pub fn new(terminal: T, options: UiOptions) -> UiResult<Self> {
        let mut ui = Self {
            terminal,
            decoder: InputDecoder::new(),
            options: UiOptions::default(),
            layout: ScreenLayout::default(),
            window: Window::new(),
            menu: Menu::new(),
            info: Info::new(),
            cursor_mode: CursorMode::default(),
            cursor: DisplayCoord::default(),
            status_len: 0,
            output: Vec::with_capacity(16 * 1024),
            pending_title: None,
            dirty: false,
            resize_pending: false,
            mouse_enabled: false,
            detached: false,
            on_key: None,
        };

        ui.setup_terminal();
        ui.terminal.set_raw_mode()?;
        ui.set_ui_options(options);
        ui.check_resize(true);
        ui.redraw();
        debug!(dimensions = ?ui.layout.dimensions, "terminal ui started");
        Ok(ui)
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn options(&self) -> &UiOptions {
        &self.options
    }

    /// Content area size: terminal rows minus the status line
    pub fn dimensions(&self) -> DisplayCoord {
        self.layout.dimensions
    }

    pub fn layout(&self) -> ScreenLayout {
        self.layout
    }

    /// Something was drawn since the last refresh
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    /// The terminal hung up and input is no longer read
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Draw the buffer lines, then `~` filler rows down to the status line
    pub fn draw(&mut self, lines: &[DisplayLine], default_face: Face, padding_face: Face) {
        self.check_resize(false);

        let dimensions = self.layout.dimensions;
        let offset = self.layout.content_line_offset();
        let mut line_index = offset;
        for line in lines.iter().take(dimensions.line.max(0) as usize) {
            self.window.move_cursor(DisplayCoord::line(line_index));
            self.window.draw(line.atoms(), default_face);
            line_index += 1;
        }

        let face = merge_faces(default_face, padding_face);
        while line_index < dimensions.line + offset {
            self.window.move_cursor(DisplayCoord::line(line_index));
            self.window.draw(&[DisplayAtom::plain("~")], face);
            line_index += 1;
        }

        self.dirty = true;
    }

    /// Draw the status line, with the mode line right-aligned.
    ///
    /// A mode line that does not fit after the status text is cut from the
    /// left and prefixed with `…` so it exactly fills the space left.
    pub fn draw_status(&mut self, status_line: &DisplayLine, mode_line: &DisplayLine, default_face: Face) {
        let status_line_pos = self.layout.status_line();
        let columns = self.layout.dimensions.column;
        self.window.move_cursor(DisplayCoord::line(status_line_pos));
        self.window.draw(status_line.atoms(), default_face);

        let mode_len = mode_line.length();
        self.status_len = status_line.length();
        let remaining = columns - self.status_len;
        if mode_len < remaining {
            self.window
                .move_cursor(DisplayCoord::new(status_line_pos, columns - mode_len));
            self.window.draw(mode_line.atoms(), default_face);
        } else if remaining > 2 {
            let mut trimmed = mode_line.clone();
            trimmed.trim(mode_len + 2 - remaining, remaining - 2);
            trimmed.insert(0, DisplayAtom::plain("…"));
            debug_assert_eq!(trimmed.length(), remaining - 1);

            self.window
                .move_cursor(DisplayCoord::new(status_line_pos, columns - remaining + 1));
            self.window.draw(trimmed.atoms(), default_face);
        }

        if self.options.set_title {
            self.queue_title(mode_line);
        }

        self.dirty = true;
    }

    /// Remember the title for the next redraw, replacing any title not yet
    /// sent; non-printable characters become `?`
    fn queue_title(&mut self, mode_line: &DisplayLine) {
        let title: String = mode_line
            .atoms()
            .iter()
            .flat_map(|atom| atom.content.chars())
            .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
            .take(MAX_TITLE_LEN)
            .collect();
        self.pending_title = Some(title);
    }

    pub fn set_cursor(&mut self, mode: CursorMode, coord: DisplayCoord) {
        self.cursor_mode = mode;
        self.cursor = coord;
    }

    /// Redraw when something changed, or unconditionally with `force`
    pub fn refresh(&mut self, force: bool) {
        if self.dirty || force {
            self.redraw();
        }
        self.dirty = false;
    }

    /// Compose every window and the cursor into one flush
    fn redraw(&mut self) {
        if let Some(title) = self.pending_title.take() {
            self.output.extend_from_slice(b"\x1b]2;");
            self.output.extend_from_slice(title.as_bytes());
            self.output.push(0x07);
        }
        self.window.refresh(&mut self.output);

        // A search menu hidden under the status text is skipped
        if self.menu.columns() != 0 || self.menu.window().pos().column > self.status_len {
            self.menu.window().refresh(&mut self.output);
        }
        self.info.window().refresh(&mut self.output);

        let cursor = match self.cursor_mode {
            CursorMode::Prompt => DisplayCoord::new(self.layout.status_line(), self.cursor.column),
            CursorMode::Buffer => {
                self.cursor + DisplayCoord::line(self.layout.content_line_offset())
            },
        };
        write_cursor_pos(&mut self.output, cursor);
        self.flush_output();
    }

    fn flush_output(&mut self) {
        let result = self
            .terminal
            .write_all(&self.output)
            .and_then(|()| self.terminal.flush());
        if let Err(err) = result {
            warn!(%err, bytes = self.output.len(), "terminal write failed");
        }
        self.output.clear();
    }

    pub fn menu_show(
        &mut self,
        items: Vec<DisplayLine>,
        anchor: DisplayCoord,
        fg: Face,
        bg: Face,
        style: MenuStyle,
    ) {
        self.menu.show(items, anchor, fg, bg, style, &self.layout);
        self.dirty = true;
        self.reshow_info();
    }

    /// Select a menu item; negative or out of range clears the selection
    pub fn menu_select(&mut self, selected: i32) {
        self.menu.select(usize::try_from(selected).ok());
        self.dirty = true;
    }

    pub fn menu_hide(&mut self) {
        if !self.menu.is_active() {
            return;
        }
        self.menu.hide();
        self.dirty = true;
        self.reshow_info();
    }

    /// Show an info box; it is silently dropped when it does not fit
    pub fn info_show(
        &mut self,
        title: &str,
        content: &str,
        anchor: DisplayCoord,
        face: Face,
        style: InfoStyle,
    ) {
        self.info_hide();
        let shown = self.info.show(
            title,
            content,
            anchor,
            face,
            style,
            &self.layout,
            self.menu.rect(),
            self.options.assistant.art(),
        );
        if shown {
            self.dirty = true;
        }
    }

    pub fn info_hide(&mut self) {
        if !self.info.is_active() {
            return;
        }
        self.info.hide();
        self.dirty = true;
    }

    /// Lay the current info box out again around the menu
    fn reshow_info(&mut self) {
        if self.info.is_active() {
            self.info
                .reshow(&self.layout, self.menu.rect(), self.options.assistant.art());
            self.dirty = true;
        }
    }

    /// Re-query the terminal size on a pending resize, or always with
    /// `force`, and rebuild every window.
    ///
    /// When the size cannot be queried nothing changes; the next resize
    /// notification tries again.
    pub fn check_resize(&mut self, force: bool) {
        let signalled = self.terminal.take_resize();
        if !force && !signalled {
            return;
        }

        let Some(size) = self.terminal.window_size() else {
            debug!("window size unavailable");
            return;
        };

        let menu_active = self.menu.is_active();
        let info_active = self.info.is_active();
        self.window.destroy();
        self.menu.destroy();
        self.info.hide();

        let size = size.to_coord();
        self.window.create(DisplayCoord::default(), size);
        self.layout.dimensions = DisplayCoord::new(size.line - 1, size.column);
        debug!(dimensions = ?self.layout.dimensions, "resized");

        if menu_active {
            self.menu.reshow(&self.layout);
        }
        if info_active {
            self.info
                .reshow(&self.layout, self.menu.rect(), self.options.assistant.art());
        }

        self.resize_pending = true;
    }

    /// Next input event, if any is available right now.
    ///
    /// A pending resize is reported before any input byte is read. After
    /// a hangup nothing is read any more.
    pub fn get_next_key(&mut self) -> Option<Key> {
        // Hangup is checked before resize: a lost terminal has no size
        if self.terminal.hung_up() {
            if !self.detached {
                debug!("terminal hung up, detaching");
                self.window.destroy();
                self.detached = true;
            }
            return None;
        }

        if self.terminal.take_stop() {
            self.suspend();
        }

        self.check_resize(false);
        if self.resize_pending {
            self.resize_pending = false;
            return Some(Key::resize(self.layout.dimensions));
        }

        match self.decoder.decode(&mut self.terminal) {
            Decoded::Key(key) => {
                trace!(%key, "key");
                Some(key)
            },
            Decoded::Suspend => {
                self.suspend();
                None
            },
            Decoded::None => None,
        }
    }

    /// Register the callback fed by [`TerminalUi::process_input`]
    pub fn set_on_key(&mut self, callback: impl FnMut(Key) + 'static) {
        self.on_key = Some(Box::new(callback));
    }

    /// Feed every available event to the key callback; returns how many
    pub fn process_input(&mut self) -> usize {
        let Some(mut on_key) = self.on_key.take() else {
            return 0;
        };
        let mut count = 0;
        while let Some(key) = self.get_next_key() {
            on_key(key);
            count += 1;
        }
        self.on_key = Some(on_key);
        count
    }

    /// Block until input is readable, a signal arrives or `timeout` expires
    pub fn wait_for_input(&mut self, timeout: Option<std::time::Duration>) -> bool {
        if self.detached {
            return false;
        }
        self.terminal.wait_for_input(timeout)
    }

    /// Hand the terminal back to the shell until resumed.
    ///
    /// The order matters: nothing may be written to the terminal after the
    /// original mode is restored until the process is resumed.
    pub fn suspend(&mut self) {
        debug!("suspend");
        let mouse_enabled = self.mouse_enabled;
        self.enable_mouse(false);
        self.restore_terminal();
        if let Err(err) = self.terminal.restore_mode() {
            warn!(%err, "failed to restore terminal mode");
        }

        self.terminal.yield_to_job_control();

        self.setup_terminal();
        self.check_resize(true);
        if let Err(err) = self.terminal.set_raw_mode() {
            warn!(%err, "failed to re-enter raw mode");
        }
        self.enable_mouse(mouse_enabled);
        self.refresh(true);
    }

    /// Turn mouse and focus reporting on or off
    pub fn enable_mouse(&mut self, enabled: bool) {
        if enabled == self.mouse_enabled {
            return;
        }
        self.mouse_enabled = enabled;
        if enabled {
            self.output.extend_from_slice(MOUSE_ON);
        } else {
            self.output.extend_from_slice(MOUSE_OFF);
            self.decoder.reset_mouse_state();
        }
        self.flush_output();
    }

    /// Apply a new option set
    pub fn set_ui_options(&mut self, options: UiOptions) {
        self.layout.status_on_top = options.status_on_top;
        self.decoder
            .set_content_line_offset(self.layout.content_line_offset());
        self.decoder.set_shift_function_key(options.shift_function_key);
        self.decoder.set_wheel(
            options.wheel_up_button,
            options.wheel_down_button,
            options.wheel_scroll_amount,
        );
        self.enable_mouse(options.enable_mouse);
        self.options = options;
    }

    fn setup_terminal(&mut self) {
        self.output.extend_from_slice(ENTER_ALTERNATE_SCREEN);
        self.flush_output();
    }

    fn restore_terminal(&mut self) {
        self.output.extend_from_slice(LEAVE_ALTERNATE_SCREEN);
        self.flush_output();
    }
}

impl<T: Terminal> Drop for TerminalUi<T> {
    fn drop(&mut self) {
        self.enable_mouse(false);
        self.restore_terminal();
        if let Err(err) = self.terminal.restore_mode() {
            warn!(%err, "failed to restore terminal mode");
        }
        debug!("terminal ui stopped");
    }
}
