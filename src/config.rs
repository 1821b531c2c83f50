//! User interface options
//!
//! Options come either from the editor's string option map (`terminal_*`
//! keys) or from a TOML file using the field names.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::Assistant;
use crate::tty::{UiError, UiResult};

/// Default offset above which function keys are reported shifted
pub const DEFAULT_SHIFT_FUNCTION_KEY: i32 = 12;

/// Options recognised by the terminal user interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiOptions {
    /// Art shown beside prompt info boxes
    pub assistant: Assistant,
    /// Status line on the first row instead of the last
    pub status_on_top: bool,
    /// Mirror the mode line into the terminal title
    pub set_title: bool,
    /// F(n) with n above this is reported as Shift+F(n - offset)
    pub shift_function_key: i32,
    pub enable_mouse: bool,
    /// X11 button number meaning "scroll up"
    pub wheel_up_button: i32,
    /// X11 button number meaning "scroll down"
    pub wheel_down_button: i32,
    pub wheel_scroll_amount: i32,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            assistant: Assistant::default(),
            status_on_top: false,
            set_title: true,
            shift_function_key: DEFAULT_SHIFT_FUNCTION_KEY,
            enable_mouse: true,
            wheel_up_button: 4,
            wheel_down_button: 5,
            wheel_scroll_amount: 3,
        }
    }
}

fn is_yes(value: &str) -> bool {
    value == "yes" || value == "true"
}

impl UiOptions {
    /// Build options from the editor's option map.
    ///
    /// Missing keys and unparsable values keep their defaults. Boolean
    /// options are on for `yes`/`true` only.
    pub fn from_map(options: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| options.get(key).map(String::as_str);
        let int = |key: &str, default: i32| {
            get(key)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            assistant: get("terminal_assistant")
                .and_then(Assistant::from_name)
                .unwrap_or(defaults.assistant),
            status_on_top: get("terminal_status_on_top").is_some_and(is_yes),
            set_title: get("terminal_set_title").map_or(true, is_yes),
            shift_function_key: int("terminal_shift_function_key", defaults.shift_function_key),
            enable_mouse: get("terminal_enable_mouse").map_or(true, is_yes),
            wheel_up_button: int("terminal_wheel_up_button", defaults.wheel_up_button),
            wheel_down_button: int("terminal_wheel_down_button", defaults.wheel_down_button),
            wheel_scroll_amount: int("terminal_wheel_scroll_amount", defaults.wheel_scroll_amount),
        }
    }

    /// Parse options from a TOML string
    pub fn from_toml(content: &str) -> UiResult<Self> {
        toml::from_str(content).map_err(|e| UiError::Config(e.to_string()))
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> UiResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml(&content)?;
        debug!(path = %path.display(), ?options, "loaded ui options");
        Ok(options)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> UiResult<String> {
        toml::to_string_pretty(self).map_err(|e| UiError::Config(e.to_string()))
    }
}
