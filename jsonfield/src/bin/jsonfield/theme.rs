use colored::Color;
use once_cell::sync::Lazy;

/// Colors for status lines, headings and attribute paths
pub struct ColorTheme {
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub muted: Color,
    pub heading: Color,
    pub accent: Color,
    pub command: Color,
    pub path: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            muted: Color::BrightBlack,
            heading: Color::BrightBlue,
            accent: Color::Cyan,
            command: Color::Magenta,
            path: Color::BrightCyan,
        }
    }
}

pub static THEME: Lazy<ColorTheme> = Lazy::new(ColorTheme::default);

pub struct Icons {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub arrow: &'static str,
    pub bullet: &'static str,
    /// Stands in for a path that resolved to nothing.
    pub missing: &'static str,
}

pub const ICONS: Icons = Icons {
    success: "✓",
    error: "✗",
    warning: "⚠",
    arrow: "→",
    bullet: "•",
    missing: "∅",
};
