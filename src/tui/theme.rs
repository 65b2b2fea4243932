//! Terminal theme detection and color definitions

use ratatui::style::Color;

use crate::types::ActivityLevel;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color (summary, tooltip body)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selection, key hints, tooltip border)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (weekday and month labels, footer)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Error indicator color
    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Warning color (configuration prompt)
    pub fn warn(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// GitHub-style green gradient for the five activity levels
    pub fn level_color(self, level: ActivityLevel) -> Color {
        match self {
            Self::Dark => match level {
                ActivityLevel::None => Color::Indexed(236),
                ActivityLevel::Low => Color::Indexed(22),
                ActivityLevel::Medium => Color::Indexed(28),
                ActivityLevel::High => Color::Indexed(34),
                ActivityLevel::Max => Color::Indexed(40),
            },
            Self::Light => match level {
                ActivityLevel::None => Color::Indexed(254),
                ActivityLevel::Low => Color::Indexed(194),
                ActivityLevel::Medium => Color::Indexed(157),
                ActivityLevel::High => Color::Indexed(71),
                ActivityLevel::Max => Color::Indexed(28),
            },
        }
    }
}
