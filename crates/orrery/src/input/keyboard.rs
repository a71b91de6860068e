//! Keyboard shortcuts

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Keys the view responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Space bar
    Space,
    /// R key
    R,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Number row digit `1..=9`
    Digit(u8),
}

/// What a key press asks the view to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Toggle play/pause
    TogglePlay,
    /// Fly back to the overview
    ResetView,
    /// Change speed by this many speed steps
    AdjustSpeed(i32),
    /// Focus the n-th planet (zero-based, roster order)
    FocusPlanet(usize),
}

impl KeyCode {
    /// Action bound to this key, if any
    pub fn action(self) -> Option<KeyAction> {
        match self {
            Self::Space => Some(KeyAction::TogglePlay),
            Self::R => Some(KeyAction::ResetView),
            Self::ArrowUp => Some(KeyAction::AdjustSpeed(1)),
            Self::ArrowDown => Some(KeyAction::AdjustSpeed(-1)),
            Self::Digit(n @ 1..=9) => Some(KeyAction::FocusPlanet(usize::from(n - 1))),
            Self::Digit(_) => None,
        }
    }
}

/// Unknown key name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for KeyCode {
    type Err = UnknownKey;

    /// Parse a key name as reported by browsers and windowing toolkits
    /// (`"Space"`, `" "`, `"r"`, `"KeyR"`, `"ArrowUp"`, `"Digit3"`, `"3"`)
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = match name {
            " " | "Space" => Self::Space,
            "r" | "R" | "KeyR" => Self::R,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            other => {
                let digit = other.strip_prefix("Digit").unwrap_or(other);
                match digit.parse::<u8>() {
                    Ok(n) if n <= 9 && digit.len() == 1 => Self::Digit(n),
                    _ => return Err(UnknownKey(name.to_string())),
                }
            }
        };
        Ok(key)
    }
}
