//! Theme and status styling.
//!
//! Provides distinct colors per entry status and a highlight for the
//! selected row, in a dark and a light palette.

use crate::config::THEME_LIGHT;
use crate::model::EntryStatus;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Colors on or off, explicitly.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== LogStyles =====

/// Styles used by the log widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStyles {
    pass: Style,
    fail: Style,
    warn: Style,
    muted: Style,
    selected: Style,
    heading: Style,
}

impl LogStyles {
    /// Styles for a theme name. Unknown themes fall back to dark.
    pub fn for_theme(theme: &str, colors: ColorConfig) -> Self {
        if !colors.colors_enabled() {
            return Self {
                pass: Style::default(),
                fail: Style::default(),
                warn: Style::default(),
                muted: Style::default(),
                selected: Style::default().add_modifier(Modifier::REVERSED),
                heading: Style::default().add_modifier(Modifier::BOLD),
            };
        }

        let (muted, heading) = if theme == THEME_LIGHT {
            (Color::DarkGray, Color::Blue)
        } else {
            (Color::Gray, Color::Cyan)
        };
        Self {
            pass: Style::default().fg(Color::Green),
            fail: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            warn: Style::default().fg(Color::Yellow),
            muted: Style::default().fg(muted),
            selected: Style::default().add_modifier(Modifier::REVERSED),
            heading: Style::default().fg(heading).add_modifier(Modifier::BOLD),
        }
    }

    /// Style for a status badge.
    pub fn status(&self, status: EntryStatus) -> Style {
        match status {
            EntryStatus::Pass => self.pass,
            EntryStatus::Fail | EntryStatus::Error => self.fail,
            EntryStatus::Warn => self.warn,
            EntryStatus::Info | EntryStatus::Unset => self.muted,
        }
    }

    /// Secondary text (kind labels, continuation lines).
    pub fn muted(&self) -> Style {
        self.muted
    }

    /// The selected row.
    pub fn selected(&self) -> Style {
        self.selected
    }

    /// Section headings in the details pane.
    pub fn heading(&self) -> Style {
        self.heading
    }
}

impl Default for LogStyles {
    fn default() -> Self {
        Self::for_theme(crate::config::THEME_DARK, ColorConfig::new(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(no_color)]
    fn color_config_respects_no_color_flag() {
        let config = ColorConfig::from_env_and_args(true);
        assert!(!config.colors_enabled(), "--no-color flag should disable colors");
    }

    #[test]
    #[serial(no_color)]
    fn color_config_respects_no_color_env_var() {
        std::env::set_var("NO_COLOR", "");
        let config = ColorConfig::from_env_and_args(false);
        assert!(!config.colors_enabled(), "NO_COLOR with any value disables colors");
        std::env::remove_var("NO_COLOR");
    }

    #[test]
    #[serial(no_color)]
    fn color_config_enables_colors_by_default() {
        std::env::remove_var("NO_COLOR");
        assert!(ColorConfig::from_env_and_args(false).colors_enabled());
    }

    #[test]
    fn failures_and_passes_are_distinct() {
        let styles = LogStyles::default();
        assert_ne!(
            styles.status(EntryStatus::Fail).fg,
            styles.status(EntryStatus::Pass).fg
        );
        assert_eq!(styles.status(EntryStatus::Fail), styles.status(EntryStatus::Error));
    }

    #[test]
    fn light_theme_changes_muted_color() {
        let dark = LogStyles::for_theme("dark", ColorConfig::new(true));
        let light = LogStyles::for_theme("light", ColorConfig::new(true));
        assert_ne!(dark.muted().fg, light.muted().fg);
    }

    #[test]
    fn disabled_colors_have_no_foreground() {
        let styles = LogStyles::for_theme("dark", ColorConfig::new(false));
        assert!(styles.status(EntryStatus::Fail).fg.is_none());
        assert!(styles.selected().add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn unknown_theme_falls_back_to_dark() {
        let dark = LogStyles::for_theme("dark", ColorConfig::new(true));
        assert_eq!(LogStyles::for_theme("solarized", ColorConfig::new(true)), dark);
    }
}
