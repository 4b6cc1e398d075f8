//! Process-wide presentation preferences. Nothing in the game engine reads these.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

static DARK_THEME: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown theme: {0}")]
pub struct UnknownTheme(String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

pub fn theme() -> Theme {
    if DARK_THEME.load(Ordering::Relaxed) {
        Theme::Dark
    } else {
        Theme::Light
    }
}

pub fn set_theme(theme: Theme) {
    DARK_THEME.store(theme == Theme::Dark, Ordering::Relaxed);
}

/// Flips the theme and returns the new one.
pub fn toggle_theme() -> Theme {
    let was_dark = DARK_THEME.fetch_xor(true, Ordering::Relaxed);
    if was_dark { Theme::Light } else { Theme::Dark }
}
