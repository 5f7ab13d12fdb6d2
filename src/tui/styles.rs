//! Color palette and preset styles.
//!
//! Verdict colors match [`Verdict::color`]; everything else is the shared
//! teal/slate palette.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Verdict;

/// Medical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF
    pub const BORDER: Color = Color::Rgb(148, 163, 184); // #94A3B8

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Title of the field or pane that has focus
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    /// Headline style for a verdict
    #[must_use]
    pub fn verdict(verdict: Verdict) -> Style {
        let (r, g, b) = verdict.color();
        Style::default()
            .fg(Color::Rgb(r, g, b))
            .add_modifier(Modifier::BOLD)
    }

    /// Bar style for one attribution. Positive weights push toward disease.
    #[must_use]
    pub fn attribution(weight: f64) -> Style {
        if weight > 0.0 {
            Self::danger()
        } else {
            Self::success()
        }
    }

    /// Gauge style for a disease probability
    #[must_use]
    pub fn probability(p: f64) -> Style {
        if p >= 0.7 {
            Self::danger()
        } else if p >= 0.3 {
            Self::warning()
        } else {
            Self::success()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_colors_follow_palette() {
        assert_eq!(MedicalTheme::verdict(Verdict::NoDisease).fg, Some(MedicalTheme::SUCCESS));
        assert_eq!(MedicalTheme::verdict(Verdict::Disease).fg, Some(MedicalTheme::DANGER));
    }

    #[test]
    fn test_probability_bands() {
        assert_eq!(MedicalTheme::probability(0.1).fg, Some(MedicalTheme::SUCCESS));
        assert_eq!(MedicalTheme::probability(0.5).fg, Some(MedicalTheme::WARNING));
        assert_eq!(MedicalTheme::probability(0.9).fg, Some(MedicalTheme::DANGER));
    }
}
