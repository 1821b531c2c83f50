//! Screen model
//!
//! Platform-independent display state. This module contains:
//! - Coordinates and rectangles
//! - Faces (colors and attributes) and their SGR encoding
//! - Display atoms and lines, measured in display columns
//! - Off-screen windows and their deterministic snapshots
//!
//! Nothing in here touches the terminal; windows render into a byte
//! buffer owned by the caller.

mod coord;
mod face;
mod line;
pub mod sgr;
mod snapshot;
mod window;

pub use coord::{DisplayCoord, Rect};
pub use face::{merge_faces, Attributes, Color, Face, NamedColor};
pub use line::{char_width, column_length, split_at_column, DisplayAtom, DisplayLine};
pub use snapshot::{AtomSnapshot, Snapshot};
pub use window::{line_width, Window};
