//! Assistant art shown beside prompt info boxes

use serde::{Deserialize, Serialize};

const CAT: &[&str] = &[
    r"  ___            ",
    r" (__ \           ",
    r"   / /          ╭",
    r"  .' '·.        │",
    r" '      ”       │",
    r" ╰       /\_/|  │",
    r"  | .         \ │",
    r"  ╰_J`    | | | ╯",
    r"      ' \__- _/  ",
    r"      \_\   \_\  ",
    r"                 ",
];

const CLIPPY: &[&str] = &[
    " ╭──╮   ",
    " │  │   ",
    " @  @  ╭",
    " ││ ││ │",
    " ││ ││ ╯",
    " │╰─╯│  ",
    " ╰───╯  ",
    "        ",
];

const DILBERT: &[&str] = &[
    r"  დოოოოოდ   ",
    r"  |     |   ",
    r"  |     |  ╭",
    r"  |-ᱛ ᱛ-|  │",
    r" Ͼ   ∪   Ͽ │",
    r"  |     |  ╯",
    r" ˏ`-.ŏ.-´ˎ  ",
    r"     @      ",
    r"      @     ",
    r"            ",
];

/// Which art accompanies prompt info boxes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assistant {
    #[default]
    Clippy,
    Cat,
    Dilbert,
    #[serde(alias = "off")]
    None,
}

impl Assistant {
    /// Parse an option value; `None` for unrecognized names
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "clippy" => Some(Assistant::Clippy),
            "cat" => Some(Assistant::Cat),
            "dilbert" => Some(Assistant::Dilbert),
            "none" | "off" => Some(Assistant::None),
            _ => None,
        }
    }

    /// Art lines, all of the same display width; empty for `None`
    pub fn art(self) -> &'static [&'static str] {
        match self {
            Assistant::Clippy => CLIPPY,
            Assistant::Cat => CAT,
            Assistant::Dilbert => DILBERT,
            Assistant::None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::column_length;

    #[test]
    fn test_art_lines_have_uniform_width() {
        for assistant in [Assistant::Clippy, Assistant::Cat, Assistant::Dilbert] {
            let art = assistant.art();
            let width = column_length(art[0]);
            assert!(art.iter().all(|line| column_length(line) == width));
        }
        assert!(Assistant::None.art().is_empty());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Assistant::from_name("cat"), Some(Assistant::Cat));
        assert_eq!(Assistant::from_name("off"), Some(Assistant::None));
        assert_eq!(Assistant::from_name("bob"), None);
    }
}
