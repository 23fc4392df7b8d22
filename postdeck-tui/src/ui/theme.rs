use postdeck_types::ColorScheme;
use ratatui::style::Color;

pub struct ThemeColors {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub text: Color,
    pub text_dim: Color,
    pub background: Color,
    pub border: Color,
    pub warning: Color,
    pub error: Color,
    pub highlight_bg: Color,
}

/// Get theme colors for a color scheme
/// Each theme is a complete color overhaul with proper contrast
pub fn get_theme_colors(scheme: ColorScheme) -> ThemeColors {
    match scheme {
        // Terminal Green - Classic hacker aesthetic
        ColorScheme::Default => ThemeColors {
            primary: Color::Rgb(0, 255, 0),
            secondary: Color::Rgb(0, 200, 0),
            accent: Color::Rgb(0, 255, 100),
            text: Color::Rgb(0, 255, 0),
            text_dim: Color::Rgb(0, 150, 0),
            background: Color::Black,
            border: Color::Rgb(0, 200, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            highlight_bg: Color::Rgb(0, 50, 0),
        },

        // Dark Mode - Modern dark theme with blue accents
        ColorScheme::Dark => ThemeColors {
            primary: Color::Rgb(100, 200, 255),
            secondary: Color::Rgb(150, 150, 255),
            accent: Color::Rgb(255, 100, 200),
            text: Color::Rgb(220, 220, 220),
            text_dim: Color::Rgb(120, 120, 120),
            background: Color::Rgb(20, 20, 25),
            border: Color::Rgb(60, 60, 70),
            warning: Color::Rgb(255, 200, 100),
            error: Color::Rgb(255, 100, 100),
            highlight_bg: Color::Rgb(40, 40, 50),
        },

        // Light Mode - True light theme with dark text
        ColorScheme::Light => ThemeColors {
            primary: Color::Rgb(0, 100, 200),
            secondary: Color::Rgb(100, 50, 200),
            accent: Color::Rgb(200, 0, 100),
            text: Color::Rgb(30, 30, 30),
            text_dim: Color::Rgb(100, 100, 100),
            background: Color::Rgb(250, 250, 250),
            border: Color::Rgb(180, 180, 180),
            warning: Color::Rgb(200, 150, 0),
            error: Color::Rgb(200, 0, 0),
            highlight_bg: Color::Rgb(230, 240, 255),
        },

        // Solarized Dark
        ColorScheme::Solarized => ThemeColors {
            primary: Color::Rgb(38, 139, 210),
            secondary: Color::Rgb(42, 161, 152),
            accent: Color::Rgb(211, 54, 130),
            text: Color::Rgb(147, 161, 161),
            text_dim: Color::Rgb(101, 123, 131),
            background: Color::Rgb(0, 43, 54),
            border: Color::Rgb(7, 54, 66),
            warning: Color::Rgb(181, 137, 0),
            error: Color::Rgb(220, 50, 47),
            highlight_bg: Color::Rgb(7, 54, 66),
        },
    }
}
