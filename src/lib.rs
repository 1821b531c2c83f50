//! ANSI Terminal UI Library
//!
//! A display and input backend for a modal text editor, talking to the
//! terminal with raw ANSI/VT escape sequences and no capability database.
//! This crate provides:
//!
//! - `core`: Screen model, faces, display lines and off-screen windows
//! - `parser`: Terminal input decoder (keys, CSI/SS3 sequences, mouse)
//! - `tty`: Raw mode, readiness-gated reads, signals and job control
//! - `layout`: Menu and info box placement
//! - `ui`: The session controller tying it all together
//! - `config`: User interface options

pub mod config;
pub mod core;
pub mod layout;
pub mod parser;
pub mod tty;
pub mod ui;

pub use config::UiOptions;
pub use parser::{Key, KeyCode, Modifiers, MouseButton};
pub use tty::{Terminal, UiError, UiResult, WindowSize};
pub use ui::{CursorMode, TerminalUi};
