//! Theme and Styling
//!
//! Defines colors and styles for the TUI interface.

use ratatui::style::{Color, Modifier, Style};

use crate::workflow::NoticeLevel;

/// Application theme
pub struct Theme;

impl Theme {
    // === Primary Colors ===

    /// Primary accent color (cyan/teal)
    pub const ACCENT: Color = Color::Rgb(0, 212, 255);

    /// Secondary accent (green)
    pub const SUCCESS: Color = Color::Rgb(34, 197, 94);

    /// Warning color (yellow/amber)
    pub const WARNING: Color = Color::Rgb(251, 191, 36);

    /// Error color (red)
    pub const ERROR: Color = Color::Rgb(239, 68, 68);

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(229, 229, 229);
    pub const TEXT_SECONDARY: Color = Color::Rgb(161, 161, 161);
    pub const TEXT_DIM: Color = Color::Rgb(82, 82, 82);

    // === Background Colors ===

    /// Highlighted/selected background
    pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 38, 38);

    // === Border Colors ===

    pub const BORDER: Color = Color::Rgb(51, 51, 51);
    pub const BORDER_FOCUSED: Color = Color::Rgb(59, 130, 246);

    // === Chart Colors ===

    /// Series palette, cycled for pie slices
    pub const PALETTE: [Color; 6] = [
        Color::Rgb(0, 212, 255),
        Color::Rgb(34, 197, 94),
        Color::Rgb(251, 191, 36),
        Color::Rgb(239, 68, 68),
        Color::Rgb(168, 85, 247),
        Color::Rgb(59, 130, 246),
    ];

    /// Heatmap scale ends: low, middle, high
    const HEAT_LOW: (u8, u8, u8) = (49, 54, 149);
    const HEAT_MID: (u8, u8, u8) = (245, 245, 245);
    const HEAT_HIGH: (u8, u8, u8) = (165, 0, 38);

    // === Styles ===

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    /// Title style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Heading style
    pub fn heading() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    /// Selected item style
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .bg(Self::BG_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Keyboard shortcut style
    pub fn shortcut_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Shortcut description style
    pub fn shortcut_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Shortcut that cannot fire right now
    pub fn shortcut_disabled() -> Style {
        Style::default()
            .fg(Self::TEXT_DIM)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    /// Active/in-progress indicator
    pub fn active() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Input placeholder style
    pub fn placeholder() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    pub fn notice(level: NoticeLevel) -> Style {
        match level {
            NoticeLevel::Info => Self::success(),
            NoticeLevel::Warning => Self::warning(),
            NoticeLevel::Error => Self::error(),
        }
    }

    pub fn series(index: usize) -> Color {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    /// Colour for `value` on a diverging scale spanning `min..=max`.
    /// Values outside the range are clamped.
    pub fn heat(value: f64, min: f64, max: f64) -> Color {
        let span = max - min;
        let t = if span > 0.0 {
            ((value - min) / span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let (from, to, local) = if t < 0.5 {
            (Self::HEAT_LOW, Self::HEAT_MID, t * 2.0)
        } else {
            (Self::HEAT_MID, Self::HEAT_HIGH, (t - 0.5) * 2.0)
        };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * local).round() as u8;
        Color::Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
    }

    /// Dark text on light cells, light text on dark ones
    pub fn heat_text(background: Color) -> Color {
        match background {
            Color::Rgb(r, g, b) if (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000 > 140 => {
                Color::Black
            }
            _ => Color::White,
        }
    }
}

/// Status icons
pub struct Icons;

impl Icons {
    pub const COMPLETE: &'static str = "✓";
    pub const ACTIVE: &'static str = "●";
    pub const PENDING: &'static str = "○";
    pub const ERROR: &'static str = "✗";
    pub const SELECTED: &'static str = "▶";
    pub const DOT: &'static str = "•";
    pub const BAR: &'static str = "█";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_scale_ends_and_clamping() {
        assert_eq!(Theme::heat(-1.0, -1.0, 1.0), Color::Rgb(49, 54, 149));
        assert_eq!(Theme::heat(0.0, -1.0, 1.0), Color::Rgb(245, 245, 245));
        assert_eq!(Theme::heat(1.0, -1.0, 1.0), Color::Rgb(165, 0, 38));
        assert_eq!(Theme::heat(7.0, -1.0, 1.0), Theme::heat(1.0, -1.0, 1.0));
    }

    #[test]
    fn test_heat_text_contrast() {
        assert_eq!(Theme::heat_text(Color::Rgb(245, 245, 245)), Color::Black);
        assert_eq!(Theme::heat_text(Color::Rgb(49, 54, 149)), Color::White);
    }
}
