//! Theme definitions for the TUI.
//!
//! Muted base colors with accents used sparingly; dark and light palettes
//! share the same structure so every widget styles itself through
//! [`ThemePalette`] accessors rather than hardcoded colors.

use ratatui::style::{Color, Modifier, Style};

/// Core palette constants (dark variant).
pub mod colors {
    use ratatui::style::Color;

    /// Primary text.
    pub const TEXT_PRIMARY: Color = Color::Rgb(192, 202, 245); // #c0caf5

    /// Muted text - hints, placeholders, scores.
    pub const TEXT_MUTED: Color = Color::Rgb(105, 114, 158); // #696e9e

    /// Primary accent - matches, focus, titles.
    pub const ACCENT_PRIMARY: Color = Color::Rgb(122, 162, 247); // #7aa2f7

    /// Secondary accent - parameter pills, counters.
    pub const ACCENT_SECONDARY: Color = Color::Rgb(187, 154, 247); // #bb9af7

    /// Error surface.
    pub const ERROR: Color = Color::Rgb(247, 118, 142); // #f7768e

    /// Positive/score emphasis.
    pub const SCORE: Color = Color::Rgb(158, 206, 106); // #9ece6a

    /// Border color.
    pub const BORDER: Color = Color::Rgb(59, 66, 97); // #3b4261
}

#[derive(Clone, Copy, Debug)]
pub struct ThemePalette {
    pub text: Color,
    pub hint: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub error: Color,
    pub score: Color,
    pub border: Color,
}

impl ThemePalette {
    pub fn dark() -> Self {
        Self {
            text: colors::TEXT_PRIMARY,
            hint: colors::TEXT_MUTED,
            accent: colors::ACCENT_PRIMARY,
            accent_alt: colors::ACCENT_SECONDARY,
            error: colors::ERROR,
            score: colors::SCORE,
            border: colors::BORDER,
        }
    }

    pub fn light() -> Self {
        Self {
            text: Color::Rgb(40, 44, 52),
            hint: Color::Rgb(130, 135, 150),
            accent: Color::Rgb(41, 98, 255),
            accent_alt: Color::Rgb(123, 31, 162),
            error: Color::Rgb(190, 30, 60),
            score: Color::Rgb(56, 120, 40),
            border: Color::Rgb(180, 185, 200),
        }
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn body(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.hint)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn emphasis(&self) -> Style {
        Style::default().fg(self.accent)
    }
}
